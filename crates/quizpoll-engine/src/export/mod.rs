pub mod gift;

pub use gift::to_gift;
