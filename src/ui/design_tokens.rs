// SPDX-License-Identifier: MPL-2.0
#![doc = r#"
# Design Tokens

Colors, spacing and sizes shared by every widget of the enhancement window.

## Organization

- **Palette**: Gradient background, accent and status colors
- **Opacity**: Translucent surfaces
- **Spacing**: Spacing scale (8px grid)
- **Sizing**: Component sizes
- **Typography**: Font size scale
- **Radius**: Border radii
- **Shadow**: Shadow definitions

## Examples

```
use iced_lumen::ui::design_tokens::{palette, spacing, opacity};
use iced::Color;

let glass = Color {
    a: opacity::GLASS,
    ..palette::WHITE
};

let padding = spacing::MD; // 16px
```
"#]

use iced::Color;

// ============================================================================
// Color Palette
// ============================================================================

pub mod palette {
    use super::Color;

    pub const BLACK: Color = Color::BLACK;
    pub const WHITE: Color = Color::WHITE;
    pub const GRAY_400: Color = Color::from_rgb(0.4, 0.4, 0.4);
    pub const GRAY_200: Color = Color::from_rgb(0.75, 0.75, 0.75);

    // Background gradient (#1f1c2c → #928dab)
    pub const BACKGROUND_START: Color = Color::from_rgb8(0x1f, 0x1c, 0x2c);
    pub const BACKGROUND_END: Color = Color::from_rgb8(0x92, 0x8d, 0xab);

    // Buttons
    pub const ACCENT: Color = Color::from_rgb8(0xff, 0x6e, 0xc7);
    pub const ACCENT_HOVER: Color = Color::from_rgb8(0xff, 0x3f, 0xa6);

    // Status
    pub const ERROR_500: Color = Color::from_rgb(0.898, 0.224, 0.208);
    pub const WARNING_500: Color = Color::from_rgb(0.945, 0.651, 0.125);
    pub const SUCCESS_500: Color = Color::from_rgb(0.263, 0.702, 0.404);
}

// ============================================================================
// Opacity Scale
// ============================================================================

pub mod opacity {
    pub const TRANSPARENT: f32 = 0.0;
    /// Frosted panels behind images and the upload area.
    pub const GLASS: f32 = 0.1;
    /// Outline of the upload area.
    pub const OUTLINE: f32 = 0.33;
    pub const DISABLED: f32 = 0.5;
    pub const OPAQUE: f32 = 1.0;
}

// ============================================================================
// Spacing Scale (8px grid)
// ============================================================================

pub mod spacing {
    pub const XXS: f32 = 4.0;
    pub const XS: f32 = 8.0;
    pub const SM: f32 = 12.0;
    pub const MD: f32 = 16.0;
    pub const LG: f32 = 24.0;
    pub const XL: f32 = 32.0;
}

// ============================================================================
// Component Sizes
// ============================================================================

pub mod sizing {
    /// Horizontal padding inside accent buttons.
    pub const BUTTON_PADDING_X: f32 = 26.0;
    pub const BUTTON_PADDING_Y: f32 = 12.0;

    /// Largest width of the centered content column.
    pub const CONTENT_MAX_WIDTH: f32 = 1400.0;
}

// ============================================================================
// Typography Scale
// ============================================================================

pub mod typography {
    /// Page title.
    pub const TITLE_XL: f32 = 40.0;
    /// Column headings.
    pub const TITLE_SM: f32 = 20.0;
    /// Accent button labels.
    pub const BUTTON: f32 = 18.0;
    pub const BODY: f32 = 14.0;
    pub const CAPTION: f32 = 12.0;
}

// ============================================================================
// Border Radius Scale
// ============================================================================

pub mod radius {
    pub const NONE: f32 = 0.0;
    /// Accent buttons.
    pub const MD: f32 = 10.0;
    /// Upload area.
    pub const LG: f32 = 15.0;
    /// Image boxes.
    pub const XL: f32 = 20.0;
}

// ============================================================================
// Shadow Definitions
// ============================================================================

pub mod shadow {
    use super::palette;
    use iced::{Shadow, Vector};

    pub const NONE: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector::ZERO,
        blur_radius: 0.0,
    };

    pub const MD: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector { x: 0.0, y: 4.0 },
        blur_radius: 8.0,
    };
}

// ============================================================================
// Compile-time Validation
// ============================================================================

const _: () = {
    assert!(spacing::SM > spacing::XS);
    assert!(spacing::MD > spacing::SM);
    assert!(spacing::LG > spacing::MD);

    assert!(opacity::TRANSPARENT == 0.0);
    assert!(opacity::OPAQUE == 1.0);
    assert!(opacity::GLASS > 0.0 && opacity::GLASS < opacity::OUTLINE);

    assert!(typography::TITLE_XL > typography::TITLE_SM);
    assert!(typography::BUTTON > typography::BODY);
    assert!(typography::BODY > typography::CAPTION);

    assert!(radius::XL > radius::LG);
    assert!(radius::LG > radius::MD);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_matches_hex_values() {
        assert!((palette::ACCENT.r - 1.0).abs() < f32::EPSILON);
        assert!((palette::ACCENT.g - 110.0 / 255.0).abs() < 1e-3);
        assert!((palette::BACKGROUND_START.b - 44.0 / 255.0).abs() < 1e-3);
        assert!(palette::ACCENT_HOVER.g < palette::ACCENT.g);
    }

    #[test]
    fn spacing_scale_is_consistent() {
        assert_eq!(spacing::MD, spacing::XS * 2.0);
        assert_eq!(spacing::LG, spacing::MD * 1.5);
    }
}
