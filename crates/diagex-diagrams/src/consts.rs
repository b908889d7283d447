//! Internal constants for diagram extraction and rendering.

/// Default code fence label marking diagram blocks.
pub const DEFAULT_FENCE: &str = "mermaid";

/// Default renderer executable (Mermaid CLI).
pub const DEFAULT_COMMAND: &str = "mmdc";

/// Default Mermaid theme.
pub const DEFAULT_THEME: &str = "default";

/// Default background color.
pub const DEFAULT_BACKGROUND: &str = "transparent";

/// Extension of staging files handed to the renderer.
pub const STAGING_EXTENSION: &str = ".mmd";
