//! Decoding of the compact upstream field names.
//!
//! Every per-movement field is named `<dir><movement><suffix>`, e.g.
//! `ntPdsgRmdrCs` is the north pedestrian remaining-time counter and
//! `ntPdsgStatNm` is the matching status string.

/// Suffix carried by remaining-time counters.
pub const REMAINING_SUFFIX: &str = "RmdrCs";

/// Suffix carried by phase status strings.
pub const STATUS_SUFFIX: &str = "StatNm";

/// Label shared by every pedestrian movement, used for display ordering.
pub const PEDESTRIAN_LABEL: &str = "보행";

/// Returns the localized label for a two-letter direction code.
pub fn direction_label(code: &str) -> Option<&'static str> {
    match code {
        "nt" => Some("북측"),
        "et" => Some("동측"),
        "st" => Some("남측"),
        "wt" => Some("서측"),
        "ne" => Some("북동측"),
        "se" => Some("남동측"),
        "sw" => Some("남서측"),
        "nw" => Some("북서측"),
        _ => None,
    }
}

/// Traffic movement kinds reported by the signal controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    Pedestrian,
    Through,
    LeftTurn,
    UTurn,
    Bus,
    Bicycle,
}

impl MovementKind {
    /// Parses a base movement code (suffix already stripped).
    pub fn from_base(base: &str) -> Option<Self> {
        match base {
            "Pdsg" => Some(Self::Pedestrian),
            "Stsg" => Some(Self::Through),
            "Ltsg" => Some(Self::LeftTurn),
            "Utsg" => Some(Self::UTurn),
            "Bssg" => Some(Self::Bus),
            "Bcsg" => Some(Self::Bicycle),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pedestrian => PEDESTRIAN_LABEL,
            Self::Through => "직진",
            Self::LeftTurn => "좌회전",
            Self::UTurn => "유턴",
            Self::Bus => "버스",
            Self::Bicycle => "자전거",
        }
    }
}

/// Strips either feed suffix, yielding the movement identity shared by both feeds.
pub fn base_movement(mov_code: &str) -> &str {
    mov_code
        .strip_suffix(REMAINING_SUFFIX)
        .or_else(|| mov_code.strip_suffix(STATUS_SUFFIX))
        .unwrap_or(mov_code)
}

/// Localized label for a full movement code (with suffix). Unknown codes
/// fall back to the raw token.
pub fn movement_label(mov_code: &str) -> &str {
    let base = base_movement(mov_code);
    if base.len() == mov_code.len() {
        // no recognised suffix, nothing to look up
        return mov_code;
    }
    match MovementKind::from_base(base) {
        Some(kind) => kind.label(),
        None => mov_code,
    }
}

/// A field name split into its direction prefix and movement code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCode<'a> {
    pub dir_code: &'a str,
    pub mov_code: &'a str,
}

impl<'a> FieldCode<'a> {
    /// Splits after the second character. Keys shorter than that leave an
    /// empty movement code.
    pub fn split(key: &'a str) -> Self {
        let at = key
            .char_indices()
            .nth(2)
            .map(|(i, _)| i)
            .unwrap_or(key.len());
        let (dir_code, mov_code) = key.split_at(at);
        Self { dir_code, mov_code }
    }

    pub fn direction_label(&self) -> &'a str {
        match direction_label(self.dir_code) {
            Some(label) => label,
            None => self.dir_code,
        }
    }

    pub fn movement_label(&self) -> &'a str {
        movement_label(self.mov_code)
    }

    /// `"<direction> <movement>"`, e.g. `"북측 보행"`.
    pub fn title(&self) -> String {
        format!("{} {}", self.direction_label(), self.movement_label())
    }
}
