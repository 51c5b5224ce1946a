//! Static page route handlers (about, account).

use askama::Template;
use askama_web::WebTemplate;
use chrono::NaiveDate;
use tracing::instrument;

use crate::filters;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate;

/// Profile shown on the account page.
#[derive(Clone)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub joined: NaiveDate,
}

impl Profile {
    /// The fixed demo profile. There are no accounts behind it.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            name: "Siraj Mohamed".to_string(),
            email: "siraj@example.com".to_string(),
            joined: NaiveDate::from_ymd_opt(2024, 11, 2).unwrap_or_default(),
        }
    }

    /// Join date as shown on the page (`2024-11-02`).
    #[must_use]
    pub fn joined_display(&self) -> String {
        self.joined.format("%Y-%m-%d").to_string()
    }
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/account.html")]
pub struct AccountTemplate {
    pub profile: Profile,
}

/// Display the About page.
#[instrument]
pub async fn about() -> AboutTemplate {
    AboutTemplate
}

/// Display the account page.
#[instrument]
pub async fn account() -> AccountTemplate {
    AccountTemplate {
        profile: Profile::demo(),
    }
}
