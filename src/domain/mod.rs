// Domain layer - Trip requests and normalized route results
pub mod route;
pub mod trip;
