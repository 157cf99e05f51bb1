//! Named document collections served by the API.

use std::fmt;

/// Document-store collection backing one family of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Pets listed for adoption.
    Pets,
    /// Registered users and their roles.
    Users,
    /// Adoption requests.
    Adopts,
    /// Donation campaigns raised for pets.
    DonationCampaigns,
    /// Individual donations to campaigns.
    Donations,
    /// Payment records written after checkout.
    Payments,
}

impl Collection {
    /// Every collection, in route-table order.
    pub const ALL: [Self; 6] = [
        Self::Pets,
        Self::Users,
        Self::Adopts,
        Self::DonationCampaigns,
        Self::Donations,
        Self::Payments,
    ];

    /// Store-side collection name.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Collection;
    ///
    /// assert_eq!(Collection::DonationCampaigns.name(), "donationCampaigns");
    /// ```
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pets => "pets",
            Self::Users => "users",
            Self::Adopts => "adopts",
            Self::DonationCampaigns => "donationCampaigns",
            Self::Donations => "donations",
            Self::Payments => "payments",
        }
    }

    /// Whether `PUT /{collection}/{id}` inserts when nothing matches.
    pub const fn upserts_on_update(self) -> bool {
        matches!(self, Self::Pets | Self::Adopts | Self::DonationCampaigns)
    }

    /// Singular noun used in error messages.
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Pets => "pet",
            Self::Users => "user",
            Self::Adopts => "adoption request",
            Self::DonationCampaigns => "donation campaign",
            Self::Donations => "donation",
            Self::Payments => "payment",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
