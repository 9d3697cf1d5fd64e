pub mod acta;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod ledger;
pub mod model;
