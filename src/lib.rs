extern crate chrono;
extern crate diesel;

pub mod auth;
pub mod config;
pub mod db;
pub mod fotos;
pub mod logger;
pub mod models;
pub mod query;
pub mod uploads;
pub mod web;
