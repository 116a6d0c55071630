pub mod delivery;
pub mod ledger;
pub mod model;
pub mod news;
pub mod pacing;
pub mod prices;

#[cfg(test)]
pub(crate) mod test_server;
