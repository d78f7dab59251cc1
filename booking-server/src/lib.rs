//! Train seat booking server.
//!
//! Keeps per-train, per-date seat inventories and arbitrates concurrent
//! booking attempts so that no seat is ever sold twice.

pub mod auth;
pub mod availability;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod ledger;
pub mod search;
pub mod web;
