//! Query-string parameters for listing routes.
//!
//! Filters and listing options are extracted separately from the same query
//! string; unknown keys are ignored by both. Values stay as raw strings so the
//! domain reports which parameter was invalid.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{
    AdoptionFilters, CampaignFilters, DonationFilters, ListingOptions, PaymentFilters, PetFilters,
};

/// Sorting and pagination shared by every listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingParams {
    /// Field to sort by.
    #[param(example = "age")]
    pub sort: Option<String>,
    /// `asc` (default) or `desc`; ignored without `sort`.
    #[param(example = "desc")]
    pub order: Option<String>,
    /// 1-based page number; requires `limit` to take effect.
    #[param(example = "2")]
    pub page: Option<String>,
    /// Maximum documents returned; zero or absent means unlimited.
    #[param(example = "10")]
    pub limit: Option<String>,
}

impl From<ListingParams> for ListingOptions {
    fn from(params: ListingParams) -> Self {
        Self {
            sort: params.sort,
            order: params.order,
            page: params.page,
            limit: params.limit,
        }
    }
}

/// Filters accepted by `GET /pets`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PetQuery {
    /// Exact category, for example `Dog`.
    pub category: Option<String>,
    /// Case-insensitive substring of the pet name.
    pub name: Option<String>,
    /// `true` or `false`.
    pub adopted: Option<String>,
    /// Owner email; must be the caller unless admin.
    pub email: Option<String>,
}

impl From<PetQuery> for PetFilters {
    fn from(query: PetQuery) -> Self {
        Self {
            category: query.category,
            name: query.name,
            adopted: query.adopted,
            email: query.email,
        }
    }
}

/// Filters accepted by `GET /donationCampaigns`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CampaignQuery {
    /// Campaign owner email; must be the caller unless admin.
    pub email: Option<String>,
    /// Case-insensitive substring of the pet name.
    pub name: Option<String>,
}

impl From<CampaignQuery> for CampaignFilters {
    fn from(query: CampaignQuery) -> Self {
        Self {
            email: query.email,
            name: query.name,
        }
    }
}

/// Filters accepted by `GET /donations`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct DonationQuery {
    /// Campaign identifier.
    pub campaign_id: Option<String>,
    /// Donor email; must be the caller unless admin.
    pub email: Option<String>,
}

impl From<DonationQuery> for DonationFilters {
    fn from(query: DonationQuery) -> Self {
        Self {
            campaign_id: query.campaign_id,
            email: query.email,
        }
    }
}

/// Filters accepted by `GET /adopts`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct AdoptionQuery {
    /// Requester email.
    pub email: Option<String>,
    /// Pet owner email.
    pub owner_email: Option<String>,
    /// Requested pet identifier.
    pub pet_id: Option<String>,
}

impl From<AdoptionQuery> for AdoptionFilters {
    fn from(query: AdoptionQuery) -> Self {
        Self {
            email: query.email,
            owner_email: query.owner_email,
            pet_id: query.pet_id,
        }
    }
}

/// Filters accepted by `GET /payments`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentQuery {
    /// Payer email.
    pub email: Option<String>,
}

impl From<PaymentQuery> for PaymentFilters {
    fn from(query: PaymentQuery) -> Self {
        Self { email: query.email }
    }
}
