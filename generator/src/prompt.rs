//! Prompt construction for SVG icon generation
//!
//! The extraction pipeline expects a single `<svg>` document with quoted
//! attributes and no surrounding chatter; every rule in the checklist below
//! exists to make that the most likely reply.

/// Role preamble placed before every instruction
pub const SYSTEM_ROLE: &str =
    "You are an expert SVG icon designer. You create clean, simple, scalable vector icons.";

/// Coordinate frame every generated icon must use
pub const CANONICAL_VIEWBOX: &str = "0 0 24 24";

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Build the complete instruction prompt for a description
pub fn build_prompt(description: &str) -> String {
    format!(
        r#"{SYSTEM_ROLE}

Generate a simple, clean SVG icon based on this description:
"{description}"

CRITICAL REQUIREMENTS:
- Output ONLY valid, well-formed SVG XML code
- ALL attribute values MUST be in double quotes (e.g., width="24" not width=24)
- Use viewBox="{CANONICAL_VIEWBOX}" for consistency
- Include xmlns="{SVG_NAMESPACE}" in the svg tag
- Keep the design minimal and clear
- Use a single solid color (preferably black: fill="black" or stroke="black")
- No gradients or complex effects
- Center the icon within the viewBox
- Self-close empty tags (e.g., <path .../> not <path ...></path>)

STRICT FORMAT:
- Start IMMEDIATELY with <svg
- End with </svg>
- NO explanations before or after
- NO markdown code blocks
- NO text outside the SVG tags

Example valid format:
<svg viewBox="{CANONICAL_VIEWBOX}" xmlns="{SVG_NAMESPACE}"><circle cx="12" cy="12" r="10" fill="black"/></svg>

Now generate the SVG for: {description}"#
    )
}
