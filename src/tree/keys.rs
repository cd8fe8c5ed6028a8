/// Field names used when reading and writing structural and derived
/// properties of tree nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keys {
    pub childs: String,
    pub folder: String,
    /// When set, every inserted node gets a back-reference to its scope.
    pub parent: Option<String>,
    pub index: String,
    pub name: String,
    pub path: String,
    pub ext: String,
    pub href: String,
    /// Record slot holding the metadata object of a record.
    pub metadata: String,
}

impl Default for Keys {
    fn default() -> Self {
        Self {
            childs: "childs".to_string(),
            folder: "folder".to_string(),
            parent: None,
            index: "index".to_string(),
            name: "name".to_string(),
            path: "path".to_string(),
            ext: "ext".to_string(),
            href: "href".to_string(),
            metadata: "metas".to_string(),
        }
    }
}

impl Keys {
    /// Every configured name paired with the option it came from.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("childrenKey", self.childs.as_str()),
            ("segmentKey", self.folder.as_str()),
            ("indexKey", self.index.as_str()),
            ("nameKey", self.name.as_str()),
            ("pathKey", self.path.as_str()),
            ("extKey", self.ext.as_str()),
            ("hrefKey", self.href.as_str()),
            ("metadataKey", self.metadata.as_str()),
        ]
        .into_iter()
        .chain(self.parent.as_deref().map(|parent| ("parentKey", parent)))
    }
}
