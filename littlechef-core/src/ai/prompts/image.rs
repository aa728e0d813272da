//! Prompt for the illustrative dish image.

/// Aspect ratio requested for every generated image.
pub const IMAGE_ASPECT_RATIO: &str = "16:9";

/// Render the image prompt from a recipe's title and description.
pub fn render_image_prompt(title: &str, description: &str) -> String {
    format!(
        r#"A beautiful Pixar-style 3D animated rendering of {title}. {description}.
Vibrant colors, cinematic lighting, Disney Ratatouille aesthetic, highly detailed textures, appetizing and warm kitchen atmosphere.
Stylized but realistic textures, restaurant quality plating. Include a subtle, friendly mouse chef silhouette in the background if appropriate."#,
        title = title,
        description = description.trim_end_matches('.'),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_image_prompt() {
        let prompt = render_image_prompt("Crêpes - Pancakes", "Thin and golden.");
        assert!(prompt.contains("rendering of Crêpes - Pancakes."));
        assert!(prompt.contains("Thin and golden."));
        assert!(!prompt.contains(".."));
    }
}
