use uuid::Uuid;

use crate::domain::enums::{
    Category, Currency, DeliveryTime, ExperienceLevel, FreelancerLevel, RateType, SkillLevel,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub name: String,
    pub level: SkillLevel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub user_id: Uuid,
    pub headline: Option<String>,
    pub hourly_rate: Option<f64>,
    pub currency: Currency,
    pub main_category: Option<Category>,
    pub rate_type_preference: Option<RateType>,
    pub experience_level: Option<ExperienceLevel>,
    pub freelancer_level: FreelancerLevel,
    pub delivery_time: Option<DeliveryTime>,
    pub average_rating: Option<f64>,
    pub completed_jobs: i32,
    /// Kept in the order the freelancer entered them.
    pub goals: Vec<String>,
    /// Kept in the order the freelancer entered them.
    pub skills: Vec<Skill>,
}

/// Client-settable part of a profile. Rating and job count are derived elsewhere.
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub headline: Option<String>,
    pub hourly_rate: Option<f64>,
    pub currency: Currency,
    pub main_category: Option<Category>,
    pub rate_type_preference: Option<RateType>,
    pub experience_level: Option<ExperienceLevel>,
    pub freelancer_level: FreelancerLevel,
    pub delivery_time: Option<DeliveryTime>,
    pub goals: Vec<String>,
    pub skills: Vec<Skill>,
}
