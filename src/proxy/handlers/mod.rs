// API endpoint handlers

pub mod proxy;
