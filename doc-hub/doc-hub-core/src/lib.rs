pub mod acl;
pub mod blob;
pub mod config;
pub mod events;
pub mod highlight;
pub mod hub;
pub mod storage;
pub mod tags;
pub mod tree;
pub mod upload;
pub mod viewer;
