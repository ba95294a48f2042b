//! This module acts as a central hub for all database-related logic.
//! It declares the specialized submodules so they can be accessed from
//! elsewhere in the application via their full path, e.g., `database::lots::get_lot`.

pub mod bids;
pub mod lots;
pub mod models;
