pub mod db;
pub mod realtime;
pub mod storage;
