use crate::domain::model::{ModuleSlug, StoreError};
use crate::markup::{Element, Markup, HIDDEN_CLASS};

/// 模組的顯示名稱
pub fn module_name(slug: &ModuleSlug) -> String {
    match slug.as_str() {
        "adsense" => "AdSense".to_string(),
        "analytics" => "Analytics".to_string(),
        "search-console" => "Search Console".to_string(),
        "pagespeed-insights" => "PageSpeed Insights".to_string(),
        "tagmanager" => "Tag Manager".to_string(),
        other => other
            .split(['-', '_'])
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Standard widget container.
#[derive(Debug, Clone)]
pub struct WidgetContainer {
    slug: String,
    no_padding: bool,
    footer: Option<Markup>,
}

impl WidgetContainer {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            no_padding: false,
            footer: None,
        }
    }

    pub fn no_padding(mut self) -> Self {
        self.no_padding = true;
        self
    }

    pub fn footer(mut self, footer: Markup) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn wrap(self, content: Markup) -> Markup {
        let mut element = Element::new("div")
            .class("googlesitekit-widget")
            .class(&format!("googlesitekit-widget--{}", self.slug))
            .class_if(self.no_padding, "googlesitekit-widget--no-padding")
            .child(
                Element::new("div")
                    .class("googlesitekit-widget__body")
                    .child(content),
            );

        if let Some(footer) = self.footer {
            element = element.child(
                Element::new("div")
                    .class("googlesitekit-widget__footer")
                    .child(footer),
            );
        }

        element.into()
    }
}

pub fn hidden(content: Markup) -> Markup {
    Element::new("div").class(HIDDEN_CLASS).child(content).into()
}

pub fn grid_cell(class_name: &str, content: Markup) -> Markup {
    Element::new("div").class(class_name).child(content).into()
}

/// Loading placeholder shown while a report is resolving.
pub fn preview_table(rows: usize, padding: bool) -> Markup {
    Element::new("div")
        .class("googlesitekit-preview-table")
        .class_if(padding, "googlesitekit-preview-table--padding")
        .children((0..rows).map(|_| {
            Element::new("div")
                .class("googlesitekit-preview-table__row")
                .child(Element::new("div").class("googlesitekit-preview-block"))
        }))
        .into()
}

pub fn report_error(module: &ModuleSlug, error: &StoreError) -> Markup {
    let mut body = Element::new("div")
        .class("googlesitekit-cta googlesitekit-cta--error")
        .attr("data-module", module.as_str())
        .child(
            Element::new("h3")
                .class("googlesitekit-cta__title")
                .text(format!("Data error in {}", module_name(module))),
        )
        .child(
            Element::new("p")
                .class("googlesitekit-cta__description")
                .text(error.message.clone()),
        );

    if let Some(reason) = &error.reason {
        body = body.child(
            Element::new("p")
                .class("googlesitekit-cta__reason")
                .text(reason.clone()),
        );
    }

    body.into()
}

pub fn report_zero(module: &ModuleSlug) -> Markup {
    Element::new("div")
        .class("googlesitekit-report-zero")
        .attr("data-module", module.as_str())
        .child(
            Element::new("h3")
                .class("googlesitekit-report-zero__title")
                .text(format!("{} Gathering Data", module_name(module))),
        )
        .child(
            Element::new("p")
                .class("googlesitekit-report-zero__description")
                .text(format!(
                    "{} data is not yet available, please check back later.",
                    module_name(module)
                )),
        )
        .into()
}

pub fn activate_module_cta(module: &ModuleSlug) -> Markup {
    Element::new("div")
        .class("googlesitekit-cta googlesitekit-cta--activate-module")
        .attr("data-module", module.as_str())
        .child(
            Element::new("h3")
                .class("googlesitekit-cta__title")
                .text(format!("Activate {}", module_name(module))),
        )
        .child(
            Element::new("button")
                .class("googlesitekit-cta-link")
                .attr("data-action", "activate-module")
                .text(format!("Set up {}", module_name(module))),
        )
        .into()
}

pub fn complete_module_activation_cta(module: &ModuleSlug) -> Markup {
    Element::new("div")
        .class("googlesitekit-cta googlesitekit-cta--complete-activation")
        .attr("data-module", module.as_str())
        .child(
            Element::new("h3")
                .class("googlesitekit-cta__title")
                .text(format!("Complete {} activation", module_name(module))),
        )
        .child(
            Element::new("button")
                .class("googlesitekit-cta-link")
                .attr("data-action", "complete-activation")
                .text("Complete setup"),
        )
        .into()
}

pub fn source_link(name: &str, href: &str, external: bool) -> Markup {
    let mut link = Element::new("a")
        .class("googlesitekit-cta-link googlesitekit-data-block__source")
        .attr("href", href);

    if external {
        link = link
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer");
    }

    Element::new("div")
        .class("googlesitekit-source-link")
        .text("Source: ")
        .child(link.text(name))
        .into()
}

pub fn table_overflow_container(content: Markup) -> Markup {
    Element::new("div")
        .class("googlesitekit-table-overflow")
        .child(
            Element::new("div")
                .class("googlesitekit-table-overflow__container")
                .child(content),
        )
        .into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeType {
    Warning,
    Info,
    Suggestion,
}

impl NoticeType {
    fn class_suffix(&self) -> &'static str {
        match self {
            NoticeType::Warning => "warning",
            NoticeType::Info => "info",
            NoticeType::Suggestion => "suggestion",
        }
    }
}

pub fn settings_notice(notice_type: NoticeType, content: Markup) -> Markup {
    Element::new("div")
        .class("googlesitekit-settings-notice")
        .class(&format!(
            "googlesitekit-settings-notice--{}",
            notice_type.class_suffix()
        ))
        .child(
            Element::new("div")
                .class("googlesitekit-settings-notice__text")
                .child(content),
        )
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(s: &str) -> ModuleSlug {
        ModuleSlug::new(s).unwrap()
    }

    #[test]
    fn test_module_name() {
        assert_eq!(module_name(&slug("search-console")), "Search Console");
        assert_eq!(module_name(&slug("adsense")), "AdSense");
        assert_eq!(module_name(&slug("optimize_v2")), "Optimize V2");
    }

    #[test]
    fn test_widget_container_classes() {
        let markup = WidgetContainer::new("searchConsolePopularKeywords")
            .no_padding()
            .footer(Markup::text("footer"))
            .wrap(Markup::text("body"));

        assert!(markup.contains_class("googlesitekit-widget--searchConsolePopularKeywords"));
        assert!(markup.contains_class("googlesitekit-widget--no-padding"));
        assert!(markup.contains_class("googlesitekit-widget__footer"));
    }

    #[test]
    fn test_preview_table_rows() {
        let markup = preview_table(5, true);
        assert_eq!(markup.find_by_class("googlesitekit-preview-table__row").len(), 5);
        assert!(markup.contains_class("googlesitekit-preview-table--padding"));
    }

    #[test]
    fn test_report_error_shows_message() {
        let error = StoreError {
            code: "403".to_string(),
            message: "User lacks permission".to_string(),
            reason: Some("insufficientPermissions".to_string()),
        };
        let markup = report_error(&slug("analytics"), &error);
        let text = markup.text_content();
        assert!(text.contains("Data error in Analytics"));
        assert!(text.contains("User lacks permission"));
        assert!(text.contains("insufficientPermissions"));
    }

    #[test]
    fn test_settings_notice_type_class() {
        let markup = settings_notice(NoticeType::Warning, Markup::text("This is a warning."));
        assert!(markup.contains_class("googlesitekit-settings-notice--warning"));
        assert_eq!(markup.text_content(), "This is a warning.");
    }
}
