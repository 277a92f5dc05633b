pub mod match_route;
pub mod root;
