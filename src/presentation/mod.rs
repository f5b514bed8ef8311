// Presentation layer - Pages, form handling and HTTP routes
pub mod app_state;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod summary_view;
pub mod trip_form;
