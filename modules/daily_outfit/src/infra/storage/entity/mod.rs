pub mod clothing_items;
pub mod outfit_recommendations;
pub mod user_profiles;
