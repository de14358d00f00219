//! Synthetic pages injected into the area tree.

use crate::{area::GenContext, theme};
use anyhow::Result;
use liquid::{Object, model::Value};
use serde::Serialize;

/// Template of the subscription form page.
pub const SUBSCRIBE_TEMPLATE: &str = "subscribe.html";
/// Template of the message page.
pub const MESSAGE_TEMPLATE: &str = "message.html";

/// A page without a source file, rendered through its own theme template.
///
/// Custom pages are never posts and never serve as an index.
#[derive(Debug, Clone)]
pub struct CustomPage {
    template: String,
    data: Object,
}

impl CustomPage {
    pub fn new(template: impl Into<String>, data: Object) -> Self {
        Self {
            template: template.into(),
            data,
        }
    }

    /// Build a custom page from any serializable data.
    pub fn from_data<T: Serialize>(template: &str, data: &T) -> Result<Self> {
        Ok(Self::new(template, theme::to_object(template, data)?))
    }

    /// Subscription form posting to `form_action`.
    pub fn subscriber(form_action: &str) -> Self {
        let mut data = Object::new();
        data.insert("form_action".into(), Value::scalar(form_action.to_owned()));
        Self::new(SUBSCRIBE_TEMPLATE, data)
    }

    /// Standalone message page, e.g. a subscription confirmation.
    pub fn message(title: &str, message: &str) -> Self {
        let mut data = Object::new();
        data.insert("title".into(), Value::scalar(title.to_owned()));
        data.insert("message".into(), Value::scalar(message.to_owned()));
        Self::new(MESSAGE_TEMPLATE, data)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn data(&self) -> &Object {
        &self.data
    }

    /// Render with the caller's data plus the site title of the active index.
    pub fn generate(&self, ctx: &GenContext) -> Result<String> {
        let mut data = self.data.clone();
        match ctx.index {
            Some(index) => {
                data.insert("site_title".into(), Value::scalar(index.title.clone()));
            }
            None if !data.contains_key("site_title") => {
                data.insert("site_title".into(), Value::scalar(String::new()));
            }
            None => {}
        }
        ctx.theme.render_custom(&self.template, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_data() {
        let page = CustomPage::subscriber("https://example.com/subscribe");
        assert_eq!(page.template(), SUBSCRIBE_TEMPLATE);
        assert_eq!(
            page.data().get("form_action"),
            Some(&Value::scalar("https://example.com/subscribe"))
        );
    }

    #[test]
    fn test_message_data() {
        let page = CustomPage::message("Thanks", "You are subscribed.");
        assert_eq!(page.template(), MESSAGE_TEMPLATE);
        assert!(page.data().contains_key("title"));
        assert!(page.data().contains_key("message"));
    }

    #[test]
    fn test_from_data() {
        #[derive(Serialize)]
        struct Data {
            count: u32,
        }
        let page = CustomPage::from_data("stats.html", &Data { count: 3 }).unwrap();
        assert!(page.data().contains_key("count"));
    }
}
