/// API route handlers
///
/// - `health`: Health check endpoint
/// - `teams`: Team and member endpoints

pub mod health;
pub mod teams;
