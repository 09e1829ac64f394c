use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    referralmodel::{ReferralStats, ReferralWithUser},
    usermodel::User,
};

/// Public projection of a user in referral contexts (code validation,
/// leaderboard, stats).
#[derive(Debug, Serialize, Deserialize)]
pub struct ReferralUserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub referral_code: String,
    pub credits: i32,
}

impl ReferralUserDto {
    pub fn from_user(user: &User) -> Self {
        ReferralUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            email: user.email.to_owned(),
            referral_code: user.referral_code.to_owned(),
            credits: user.credits,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferralStatsResponseDto {
    pub status: String,
    pub user: ReferralUserDto,
    pub stats: ReferralStats,
    pub referral_link: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateReferralResponseDto {
    pub status: String,
    pub user: ReferralUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardStatsDto {
    pub total_referred_users: i32,
    pub converted_users: i32,
    pub total_credits_earned: i32,
    pub conversion_rate: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardEntryDto {
    pub rank: usize,
    pub name: String,
    pub referral_code: String,
    pub stats: LeaderboardStatsDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardResponseDto {
    pub status: String,
    pub leaderboard: Vec<LeaderboardEntryDto>,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct LeaderboardQueryDto {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferralHistoryResponseDto {
    pub status: String,
    pub referrals: Vec<ReferralWithUser>,
    pub meta: crate::dtos::Pagination,
}
