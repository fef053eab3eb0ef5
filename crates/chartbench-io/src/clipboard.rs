use crate::actions::ExportError;
use crate::slug::slugify;

/// System clipboard seam.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// The addressable location of the page hosting the workbench.
pub trait Location {
    fn current_url(&self) -> String;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// A location fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticLocation(pub String);

impl StaticLocation {
    /// `base#slug`, the address of one chart under a shared base URL.
    pub fn for_chart(base_url: &str, title: &str) -> Self {
        Self(format!("{}#{}", base_url.trim_end_matches('#'), slugify(title)))
    }
}

impl Location for StaticLocation {
    fn current_url(&self) -> String {
        self.0.clone()
    }
}
