pub mod book;
pub mod cli_args;
pub mod error;
mod extractor;
mod middleware;
mod openapi;
mod response;
mod route;
pub mod server;
mod state;
pub mod store;

#[cfg(test)]
mod test;
