use crate::link::LinkedField;

/// One public resource: where it is posted, the table its choices are read
/// from, and the upstream endpoint it is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRoute {
    pub path: &'static str,
    pub table: &'static str,
    pub endpoint: &'static str,
    pub link: Option<LinkedField>,
}

pub const CATEGORY_LINK: LinkedField = LinkedField {
    field: "Category",
    table: "Categories",
    display_field: "Name",
};

pub static ROUTES: [ResourceRoute; 5] = [
    ResourceRoute {
        path: "/clients",
        table: "Clients",
        endpoint: "clients",
        link: None,
    },
    ResourceRoute {
        path: "/products",
        table: "Products",
        endpoint: "products",
        link: Some(CATEGORY_LINK),
    },
    ResourceRoute {
        path: "/chatbot-scripts",
        table: "Chatbot Scripts",
        endpoint: "chatbot-scripts",
        link: None,
    },
    ResourceRoute {
        path: "/follow-ups",
        table: "Follow-Ups",
        endpoint: "follow-ups",
        link: None,
    },
    ResourceRoute {
        path: "/embeds",
        table: "Embeds",
        endpoint: "embeds",
        link: None,
    },
];

/// Route for a request path. A trailing slash is ignored.
pub fn route_for(path: &str) -> Option<&'static ResourceRoute> {
    let path = path.trim_end_matches('/');
    ROUTES.iter().find(|r| r.path == path)
}
