// Application layer - Use cases and the seams to external collaborators
pub mod map_view;
pub mod normalizer;
pub mod planner;
pub mod route_gateway;
