use rand::Rng;
use resilo_engine::config::{Credentials, RunConfig};
use url::Url;

/// Everything a flow needs, passed explicitly. Flows share no mutable
/// state; data created during a step travels through locals or comes
/// from here.
#[derive(Debug, Clone)]
pub struct FlowContext {
    base: Url,
    pub customer: Credentials,
    pub admin: Credentials,
    pub registration_password: String,
    pub sample_product_id: String,
}

impl FlowContext {
    pub fn from_config(config: &RunConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            base: Url::parse(&config.base_url)?,
            customer: config.customer.clone(),
            admin: config.admin.clone(),
            registration_password: config.registration_password.clone(),
            sample_product_id: config.sample_product_id.clone(),
        })
    }

    /// Absolute URL for a path on the storefront.
    pub fn page(&self, path: &str) -> String {
        match self.base.join(path) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{}", self.base, path),
        }
    }

    pub fn product_page(&self) -> String {
        self.page(&format!("/product/{}", self.sample_product_id))
    }

    /// Random four-digit suffix for data that must not collide across
    /// runs (registration emails, created product names).
    pub fn unique_suffix() -> u32 {
        rand::thread_rng().gen_range(1000..10000)
    }
}
