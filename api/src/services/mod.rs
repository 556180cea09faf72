pub mod content_sniffer;
pub mod intake;
pub mod storage;
