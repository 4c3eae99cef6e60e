//! Writes the contact address into the page's email links.

use tracing::debug;

use crate::domain::contact::EmailAddress;
use crate::presentation::page::PageEdits;

pub const DEFAULT_EMAIL_LINK_ID: &str = "email-link";
pub const DEFAULT_EMAIL_CONTACT_ID: &str = "email-contact";

#[derive(Debug, Clone)]
pub struct ContactWiring {
    email: EmailAddress,
    link_id: String,
    contact_id: String,
}

impl ContactWiring {
    pub fn new(email: EmailAddress) -> Self {
        Self {
            email,
            link_id: DEFAULT_EMAIL_LINK_ID.to_string(),
            contact_id: DEFAULT_EMAIL_CONTACT_ID.to_string(),
        }
    }

    pub fn with_ids(mut self, link_id: impl Into<String>, contact_id: impl Into<String>) -> Self {
        self.link_id = link_id.into();
        self.contact_id = contact_id.into();
        self
    }

    /// The icon link only gets the `mailto:` target; the contact link also shows the address.
    pub fn apply(&self, edits: &mut PageEdits) {
        let mailto = self.email.mailto();
        debug!(link = %self.link_id, contact = %self.contact_id, "wiring contact links");

        edits.set_attribute(&self.link_id, "href", mailto.clone());
        edits
            .set_attribute(&self.contact_id, "href", mailto)
            .set_text(&self.contact_id, self.email.to_string());
    }
}
