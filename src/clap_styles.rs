use anstyle::{AnsiColor, Effects, Style};
use clap::builder::Styles;

pub fn clap_styles() -> Styles {
    Styles::styled()
        .header(Style::new().effects(Effects::BOLD.insert(Effects::UNDERLINE)))
        .usage(Style::new().effects(Effects::BOLD.insert(Effects::UNDERLINE)))
        .literal(Style::new().effects(Effects::BOLD))
        .placeholder(Style::new().effects(Effects::ITALIC))
        .error(
            Style::new()
                .fg_color(Some(AnsiColor::Red.into()))
                .effects(Effects::BOLD),
        )
        .valid(Style::new().fg_color(Some(AnsiColor::Green.into())))
        .invalid(Style::new().fg_color(Some(AnsiColor::Yellow.into())))
}
