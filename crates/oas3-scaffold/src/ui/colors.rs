use std::{fmt::Display, io::IsTerminal};

use clap::{
  ValueEnum,
  builder::styling::{Color as ClapColor, RgbColor, Style, Styles},
};
use comfy_table::Color as ComfyColor;
use crossterm::style::{Color, Stylize, style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
  Dark,
  Light,
}

/// What a piece of terminal output is, independent of the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
  Timestamp,
  Primary,
  Accent,
  Info,
  Success,
  Label,
  Value,
}

impl Role {
  /// `(dark, light)` palette entries.
  const fn rgb(self) -> ((u8, u8, u8), (u8, u8, u8)) {
    match self {
      Self::Timestamp => ((118, 166, 166), (92, 62, 38)),
      Self::Primary => ((191, 126, 4), (70, 42, 25)),
      Self::Accent => ((166, 84, 55), (211, 99, 70)),
      Self::Info => ((118, 166, 166), (40, 111, 170)),
      Self::Success => ((118, 166, 166), (34, 142, 90)),
      Self::Label => ((217, 164, 4), (176, 103, 66)),
      Self::Value => ((242, 211, 56), (199, 146, 76)),
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct Colors {
  enabled: bool,
  theme: Theme,
}

pub trait IntoComfyColor {
  fn into(self) -> ComfyColor;
}

impl IntoComfyColor for Color {
  fn into(self) -> ComfyColor {
    match self {
      Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
      Color::AnsiValue(value) => ComfyColor::AnsiValue(value),
      _ => ComfyColor::Reset,
    }
  }
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  /// `None` when colors are disabled, so callers emit no escape sequences at all.
  const fn pick(&self, role: Role) -> Option<Color> {
    if !self.enabled {
      return None;
    }
    let (dark, light) = role.rgb();
    let (r, g, b) = match self.theme {
      Theme::Dark => dark,
      Theme::Light => light,
    };
    Some(Color::Rgb { r, g, b })
  }

  pub const fn timestamp(&self) -> Option<Color> {
    self.pick(Role::Timestamp)
  }

  pub const fn primary(&self) -> Option<Color> {
    self.pick(Role::Primary)
  }

  pub const fn accent(&self) -> Option<Color> {
    self.pick(Role::Accent)
  }

  pub const fn info(&self) -> Option<Color> {
    self.pick(Role::Info)
  }

  pub const fn success(&self) -> Option<Color> {
    self.pick(Role::Success)
  }

  pub const fn label(&self) -> Option<Color> {
    self.pick(Role::Label)
  }

  pub const fn value(&self) -> Option<Color> {
    self.pick(Role::Value)
  }

  /// Help output styles, always drawn with the dark palette.
  pub const fn clap_styles() -> Styles {
    const fn clap(role: Role) -> Option<ClapColor> {
      let ((r, g, b), _) = role.rgb();
      Some(ClapColor::Rgb(RgbColor(r, g, b)))
    }

    Styles::styled()
      .header(Style::new().bold().underline().fg_color(clap(Role::Label)))
      .usage(Style::new().bold().fg_color(clap(Role::Label)))
      .literal(Style::new().fg_color(clap(Role::Success)))
      .placeholder(Style::new().fg_color(clap(Role::Info)))
      .error(Style::new().bold().fg_color(clap(Role::Accent)))
      .valid(Style::new().fg_color(clap(Role::Success)))
      .invalid(Style::new().bold().fg_color(clap(Role::Accent)))
  }
}

/// Renders `content` in `color`, or as plain text without one.
pub fn paint(content: impl Display, color: Option<Color>) -> String {
  match color {
    Some(color) => style(content).with(color).to_string(),
    None => content.to_string(),
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stdout().is_terminal(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => std::env::var("COLORFGBG")
      .ok()
      .as_deref()
      .and_then(theme_from_colorfgbg)
      .unwrap_or(Theme::Dark),
  }
}

/// `COLORFGBG` is `fg;bg`; background indexes 8 and above are light.
fn theme_from_colorfgbg(value: &str) -> Option<Theme> {
  let background = value.split(';').next_back()?.parse::<u8>().ok()?;
  Some(if background >= 8 { Theme::Light } else { Theme::Dark })
}
