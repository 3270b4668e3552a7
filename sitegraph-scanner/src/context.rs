//! Structural context of a link: the trail of landmark ancestors around an anchor.
//!
//! Kept independent of any DOM implementation. A page session describes each
//! ancestor as an [`ElementDescriptor`] and [`context_of`] turns the chain into a
//! trail such as `HEADER > NAV.primary-menu`.

/// Tags that are always landmarks.
pub const LANDMARK_TAGS: &[&str] = &["nav", "header", "footer", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Containers that only count as landmarks when they carry a known id or class.
pub const STRUCTURAL_CONTAINERS: &[(&str, Marker)] = &[
    ("div", Marker::Id("breadcrumbs")),
    ("div", Marker::Class("breadcrumbs")),
    ("ol", Marker::Class("breadcrumb")),
    ("ul", Marker::Class("breadcrumb")),
    ("ol", Marker::Class("wsu-breadcrumbs")),
    ("ul", Marker::Class("wsu-breadcrumbs")),
    ("div", Marker::Class("site-footer")),
    ("div", Marker::Class("wsu-footer-site")),
    ("ul", Marker::Id("footer-menu")),
    ("ul", Marker::Class("footer-menu")),
    ("ul", Marker::Class("wsu-footer-site__menu")),
];

pub const TRAIL_SEPARATOR: &str = " > ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Id(&'static str),
    Class(&'static str),
}

/// Tag, id and classes of one element in an ancestor chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementDescriptor {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl ElementDescriptor {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.id = if id.is_empty() { None } else { Some(id) };
        self
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes
            .into_iter()
            .map(Into::into)
            .filter(|c| !c.is_empty())
            .collect();
        self
    }

    pub fn is_landmark(&self) -> bool {
        let tag = self.tag.to_ascii_lowercase();
        if LANDMARK_TAGS.contains(&tag.as_str()) {
            return true;
        }
        STRUCTURAL_CONTAINERS
            .iter()
            .filter(|(container_tag, _)| *container_tag == tag)
            .any(|(_, marker)| match marker {
                Marker::Id(id) => self.id.as_deref() == Some(*id),
                Marker::Class(class) => self.classes.iter().any(|c| c == class),
            })
    }

    /// `TAG#id.class1.class2`
    pub fn descriptor(&self) -> String {
        let mut out = self.tag.to_ascii_uppercase();
        if let Some(ref id) = self.id {
            out.push('#');
            out.push_str(id);
        }
        for class in &self.classes {
            out.push('.');
            out.push_str(class);
        }
        out
    }
}

/// Build the context trail for an anchor.
///
/// `ancestors` is ordered from the anchor's parent outwards. The returned trail
/// lists matched landmarks outermost first, so the innermost match is last. An
/// empty string means the link sits in the page body with no landmark around it.
pub fn context_of(ancestors: &[ElementDescriptor]) -> String {
    let mut trail: Vec<String> = ancestors
        .iter()
        .filter(|el| el.is_landmark())
        .map(ElementDescriptor::descriptor)
        .collect();
    trail.reverse();
    trail.join(TRAIL_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_link_has_empty_context() {
        let chain = vec![
            ElementDescriptor::new("p"),
            ElementDescriptor::new("main").with_id("content"),
            ElementDescriptor::new("body"),
            ElementDescriptor::new("html"),
        ];
        assert_eq!(context_of(&chain), "");
    }

    #[test]
    fn test_innermost_landmark_is_last() {
        let chain = vec![
            ElementDescriptor::new("li"),
            ElementDescriptor::new("ul"),
            ElementDescriptor::new("nav").with_classes(["primary-menu"]),
            ElementDescriptor::new("header").with_id("site-header"),
            ElementDescriptor::new("body"),
        ];
        assert_eq!(context_of(&chain), "HEADER#site-header > NAV.primary-menu");
    }

    #[test]
    fn test_headings_are_landmarks() {
        let chain = vec![ElementDescriptor::new("H2"), ElementDescriptor::new("section")];
        assert_eq!(context_of(&chain), "H2");
    }

    #[test]
    fn test_structural_containers_need_their_marker() {
        let crumbs = ElementDescriptor::new("ol").with_classes(["breadcrumb", "small"]);
        assert!(crumbs.is_landmark());
        assert_eq!(crumbs.descriptor(), "OL.breadcrumb.small");

        assert!(!ElementDescriptor::new("ol").is_landmark());
        assert!(!ElementDescriptor::new("span").with_classes(["breadcrumb"]).is_landmark());

        let footer_menu = ElementDescriptor::new("ul").with_id("footer-menu");
        assert!(footer_menu.is_landmark());
        assert_eq!(footer_menu.descriptor(), "UL#footer-menu");
    }

    #[test]
    fn test_footer_menu_trail() {
        let chain = vec![
            ElementDescriptor::new("li"),
            ElementDescriptor::new("ul").with_classes(["footer-menu"]),
            ElementDescriptor::new("div").with_classes(["site-footer"]),
            ElementDescriptor::new("footer"),
        ];
        assert_eq!(context_of(&chain), "FOOTER > DIV.site-footer > UL.footer-menu");
    }

    #[test]
    fn test_empty_id_is_ignored() {
        let el = ElementDescriptor::new("nav").with_id("");
        assert_eq!(el.descriptor(), "NAV");
    }
}
