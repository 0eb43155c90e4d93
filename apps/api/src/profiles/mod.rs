pub mod handlers;
pub mod onboarding;
