pub mod fulfillment_client;

pub use fulfillment_client::{FulfillmentClient, Summarizer, Summary};
