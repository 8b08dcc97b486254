use std::str::FromStr;

use tuirealm::ratatui::style::Color;

use crate::timer::Mode;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum ThemePreset {
    #[default]
    Default,
    Light,
    HighContrast,
    Mono,
}

impl ThemePreset {
    pub const ALL: [Self; 4] = [Self::Default, Self::Light, Self::HighContrast, Self::Mono];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Light => "light",
            Self::HighContrast => "high-contrast",
            Self::Mono => "mono",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Default => "Tomato focus, teal break",
            Self::Light => "Bright background with dark text",
            Self::HighContrast => "Enhanced visibility, bright on dark",
            Self::Mono => "Minimal monochrome aesthetic",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Default => Self::Light,
            Self::Light => Self::HighContrast,
            Self::HighContrast => Self::Mono,
            Self::Mono => Self::Default,
        }
    }
}

impl FromStr for ThemePreset {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "light" | "day" => Ok(Self::Light),
            "high-contrast" | "high_contrast" | "contrast" => Ok(Self::HighContrast),
            "mono" | "monochrome" => Ok(Self::Mono),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub preset: ThemePreset,
    pub base: BasePalette,
    pub interactive: InteractivePalette,
    pub timer: TimerPalette,
    pub plan: PlanPalette,
    pub list: ListPalette,
}

#[derive(Debug, Clone, Copy)]
pub struct BasePalette {
    pub canvas: Color,
    pub text: Color,
    pub text_muted: Color,
    pub header: Color,
    pub danger: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct InteractivePalette {
    pub focus: Color,
    pub selected_bg: Color,
    pub border: Color,
    pub button_fg: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct TimerPalette {
    pub focus_accent: Color,
    pub break_accent: Color,
    pub clock: Color,
    pub clock_paused: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct PlanPalette {
    pub placeholder: Color,
    pub has_task: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct ListPalette {
    pub pending: Color,
    pub completed: Color,
    pub checkbox: Color,
    pub delete: Color,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ButtonColors {
    pub foreground: Color,
    pub background: Color,
}

impl Theme {
    pub fn from_preset(preset: ThemePreset) -> Self {
        match preset {
            ThemePreset::Default => Self {
                preset,
                base: BasePalette {
                    canvas: Color::Rgb(36, 40, 56),
                    text: Color::White,
                    text_muted: Color::DarkGray,
                    header: Color::Cyan,
                    danger: Color::Red,
                },
                interactive: InteractivePalette {
                    focus: Color::Cyan,
                    selected_bg: Color::Rgb(54, 48, 72),
                    border: Color::DarkGray,
                    button_fg: Color::Black,
                },
                timer: TimerPalette {
                    focus_accent: Color::Rgb(239, 99, 81),
                    break_accent: Color::Rgb(56, 178, 172),
                    clock: Color::White,
                    clock_paused: Color::Gray,
                },
                plan: PlanPalette {
                    placeholder: Color::DarkGray,
                    has_task: Color::LightYellow,
                },
                list: ListPalette {
                    pending: Color::White,
                    completed: Color::DarkGray,
                    checkbox: Color::LightGreen,
                    delete: Color::LightRed,
                },
            },
            ThemePreset::Light => Self {
                preset,
                base: BasePalette {
                    canvas: Color::Rgb(246, 248, 252),
                    text: Color::Rgb(32, 38, 51),
                    text_muted: Color::Rgb(95, 105, 122),
                    header: Color::Rgb(37, 99, 235),
                    danger: Color::Rgb(185, 28, 28),
                },
                interactive: InteractivePalette {
                    focus: Color::Rgb(37, 99, 235),
                    selected_bg: Color::Rgb(227, 237, 255),
                    border: Color::Rgb(196, 208, 224),
                    button_fg: Color::White,
                },
                timer: TimerPalette {
                    focus_accent: Color::Rgb(220, 38, 38),
                    break_accent: Color::Rgb(13, 148, 136),
                    clock: Color::Rgb(32, 38, 51),
                    clock_paused: Color::Rgb(95, 105, 122),
                },
                plan: PlanPalette {
                    placeholder: Color::Rgb(95, 105, 122),
                    has_task: Color::Rgb(161, 98, 7),
                },
                list: ListPalette {
                    pending: Color::Rgb(32, 38, 51),
                    completed: Color::Rgb(148, 163, 184),
                    checkbox: Color::Rgb(22, 163, 74),
                    delete: Color::Rgb(185, 28, 28),
                },
            },
            ThemePreset::HighContrast => Self {
                preset,
                base: BasePalette {
                    canvas: Color::Rgb(20, 20, 20),
                    text: Color::White,
                    text_muted: Color::Gray,
                    header: Color::LightCyan,
                    danger: Color::LightRed,
                },
                interactive: InteractivePalette {
                    focus: Color::LightCyan,
                    selected_bg: Color::Rgb(36, 36, 36),
                    border: Color::Gray,
                    button_fg: Color::Black,
                },
                timer: TimerPalette {
                    focus_accent: Color::LightRed,
                    break_accent: Color::LightGreen,
                    clock: Color::White,
                    clock_paused: Color::LightYellow,
                },
                plan: PlanPalette {
                    placeholder: Color::Gray,
                    has_task: Color::LightYellow,
                },
                list: ListPalette {
                    pending: Color::White,
                    completed: Color::Gray,
                    checkbox: Color::LightGreen,
                    delete: Color::LightRed,
                },
            },
            ThemePreset::Mono => Self {
                preset,
                base: BasePalette {
                    canvas: Color::Rgb(26, 26, 26),
                    text: Color::White,
                    text_muted: Color::Gray,
                    header: Color::White,
                    danger: Color::White,
                },
                interactive: InteractivePalette {
                    focus: Color::White,
                    selected_bg: Color::Rgb(35, 35, 35),
                    border: Color::Gray,
                    button_fg: Color::Black,
                },
                timer: TimerPalette {
                    focus_accent: Color::White,
                    break_accent: Color::Gray,
                    clock: Color::White,
                    clock_paused: Color::Gray,
                },
                plan: PlanPalette {
                    placeholder: Color::Gray,
                    has_task: Color::White,
                },
                list: ListPalette {
                    pending: Color::White,
                    completed: Color::Gray,
                    checkbox: Color::White,
                    delete: Color::White,
                },
            },
        }
    }

    pub fn mode_accent(&self, mode: Mode) -> Color {
        match mode {
            Mode::Focus => self.timer.focus_accent,
            Mode::Break => self.timer.break_accent,
        }
    }

    /// Filled accent for the active mode button, outlined text otherwise.
    pub fn mode_button(&self, mode: Mode, active: bool) -> ButtonColors {
        if active {
            ButtonColors {
                foreground: self.interactive.button_fg,
                background: self.mode_accent(mode),
            }
        } else {
            ButtonColors {
                foreground: self.mode_accent(mode),
                background: Color::Reset,
            }
        }
    }

    pub fn clock_color(&self, running: bool) -> Color {
        if running {
            self.timer.clock
        } else {
            self.timer.clock_paused
        }
    }

    pub fn plan_color(&self, has_task: bool) -> Color {
        if has_task {
            self.plan.has_task
        } else {
            self.plan.placeholder
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_preset(ThemePreset::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_default_preset() {
        let theme = Theme::default();
        assert_eq!(theme.preset, ThemePreset::Default);
        assert_eq!(theme.base.header, Color::Cyan);
        assert_eq!(theme.interactive.focus, Color::Cyan);
        assert_eq!(theme.base.text, Color::White);
    }

    #[test]
    fn test_mode_button_colors() {
        let theme = Theme::from_preset(ThemePreset::Light);
        let active = theme.mode_button(Mode::Focus, true);
        assert_eq!(active.background, theme.timer.focus_accent);
        assert_eq!(active.foreground, Color::White);

        let inactive = theme.mode_button(Mode::Break, false);
        assert_eq!(inactive.foreground, theme.timer.break_accent);
        assert_eq!(inactive.background, Color::Reset);
    }

    #[test]
    fn test_plan_and_clock_colors() {
        let theme = Theme::default();
        assert_eq!(theme.plan_color(true), theme.plan.has_task);
        assert_eq!(theme.plan_color(false), theme.plan.placeholder);
        assert_eq!(theme.clock_color(false), theme.timer.clock_paused);
    }

    #[test]
    fn test_theme_preset_parse() {
        assert_eq!(ThemePreset::from_str("default"), Ok(ThemePreset::Default));
        assert_eq!(ThemePreset::from_str("Day"), Ok(ThemePreset::Light));
        assert_eq!(
            ThemePreset::from_str("high_contrast"),
            Ok(ThemePreset::HighContrast)
        );
        assert_eq!(ThemePreset::from_str("monochrome"), Ok(ThemePreset::Mono));
        assert!(ThemePreset::from_str("unknown").is_err());
    }

    #[test]
    fn test_theme_preset_cycle() {
        let mut preset = ThemePreset::Default;
        for _ in 0..ThemePreset::ALL.len() {
            preset = preset.next();
        }
        assert_eq!(preset, ThemePreset::Default);
        assert_eq!(ThemePreset::Mono.next(), ThemePreset::Default);
    }
}
