pub mod tdata;
