pub mod auth;
pub mod confirmation;
pub mod error;
pub mod form;
pub mod middleware;
pub mod products;
pub mod routes;
pub mod session;
pub mod state;
pub mod transactions;
