mod admin;
mod failures;
mod queues;
mod shared;
mod stats;
mod workers;
