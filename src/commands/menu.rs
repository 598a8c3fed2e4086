//! Context menu model

use crate::engines::EngineRegistry;
use crate::locales::Messages;
use serde::{Deserialize, Serialize};

/// Id of the parent menu item
pub const CONTEXT_MENU_PARENT: &str = "queryswitch-parent";

/// Id prefix of the per-engine menu items
pub const CONTEXT_MENU_SWITCH_TO: &str = "queryswitch-switch-to-";

/// Pages the context menu is offered on
pub const DOCUMENT_URL_PATTERNS: &[&str] = &[
    "*://*.google.com/*",
    "*://*.google.com.*/*",
    "*://*.baidu.com/*",
    "*://*.bing.com/*",
    "*://*.yahoo.com/*",
    "*://*.duckduckgo.com/*",
];

/// One context menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub title: String,
    pub contexts: Vec<String>,
    pub document_url_patterns: Vec<String>,
}

impl MenuItem {
    fn new(id: String, parent_id: Option<String>, title: String) -> Self {
        Self {
            id,
            parent_id,
            title,
            contexts: vec!["all".to_string()],
            document_url_patterns: DOCUMENT_URL_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// The full menu: parent first, then one item per enabled engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenu {
    pub items: Vec<MenuItem>,
}

impl ContextMenu {
    /// Build the menu for the enabled engines of `registry`
    pub fn build(registry: &EngineRegistry, messages: &Messages) -> Self {
        let mut items = vec![MenuItem::new(
            CONTEXT_MENU_PARENT.to_string(),
            None,
            messages.get("context-menu-title"),
        )];

        items.extend(registry.enabled().into_iter().map(|engine| {
            MenuItem::new(
                menu_item_id(&engine.id),
                Some(CONTEXT_MENU_PARENT.to_string()),
                engine.name.clone(),
            )
        }));

        Self { items }
    }

    /// Menu shown when the user turned the context menu off
    pub fn empty() -> Self {
        Self::default()
    }

    /// Per-engine entries
    pub fn children(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter().filter(|item| item.parent_id.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Menu item id for an engine
pub fn menu_item_id(engine_id: &str) -> String {
    format!("{}{}", CONTEXT_MENU_SWITCH_TO, engine_id)
}

/// Engine id of a clicked menu item, if it is a switch item
pub fn parse_menu_item_id(item_id: &str) -> Option<&str> {
    item_id
        .strip_prefix(CONTEXT_MENU_SWITCH_TO)
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::{builtin_engines, EngineOverride};
    use std::collections::BTreeMap;

    #[test]
    fn test_build_menu() {
        let mut overrides = BTreeMap::new();
        overrides.insert("yahoo".to_string(), EngineOverride { enabled: false });
        let registry = EngineRegistry::merge(builtin_engines(), &[], &overrides);
        let messages = Messages::new("en").unwrap();

        let menu = ContextMenu::build(&registry, &messages);

        assert_eq!(menu.items[0].id, CONTEXT_MENU_PARENT);
        assert_eq!(menu.items[0].title, "Switch Search Engine");
        assert!(menu.items[0].parent_id.is_none());

        let children: Vec<&str> = menu.children().map(|i| i.title.as_str()).collect();
        assert_eq!(children, vec!["Google", "Baidu", "Bing", "DuckDuckGo"]);
        assert!(menu
            .children()
            .all(|i| i.document_url_patterns.len() == DOCUMENT_URL_PATTERNS.len()));
    }

    #[test]
    fn test_localized_parent_title() {
        let registry = EngineRegistry::builtin();
        let messages = Messages::new("zh-CN").unwrap();
        let menu = ContextMenu::build(&registry, &messages);
        assert_eq!(menu.items[0].title, "切换搜索引擎");
    }

    #[test]
    fn test_menu_item_ids() {
        assert_eq!(menu_item_id("bing"), "queryswitch-switch-to-bing");
        assert_eq!(parse_menu_item_id("queryswitch-switch-to-bing"), Some("bing"));
        assert_eq!(
            parse_menu_item_id("queryswitch-switch-to-custom_1700000000000"),
            Some("custom_1700000000000")
        );
        assert_eq!(parse_menu_item_id(CONTEXT_MENU_PARENT), None);
        assert_eq!(parse_menu_item_id("queryswitch-switch-to-"), None);
    }

    #[test]
    fn test_menu_serializes_like_extension_api() {
        let registry = EngineRegistry::builtin();
        let messages = Messages::new("en").unwrap();
        let json = serde_json::to_value(ContextMenu::build(&registry, &messages)).unwrap();

        assert_eq!(json["items"][1]["parentId"], CONTEXT_MENU_PARENT);
        assert_eq!(json["items"][1]["documentUrlPatterns"][0], "*://*.google.com/*");
        assert!(json["items"][0].get("parentId").is_none());
    }
}
