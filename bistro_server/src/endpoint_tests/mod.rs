mod helpers;
mod mocks;

mod auth;
mod cart;
mod notifications;
mod orders;
