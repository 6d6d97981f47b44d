//! Navigation menu and the Kp forecast drill-down.

use aurora_api::time::{day_month, parse_timestamp};
use aurora_api::DataSnapshot;
use chrono::FixedOffset;

use crate::cards::{about_card, values_card, weather_card};
use crate::error::RenderError;
use crate::error_mapping::guard;
use crate::surface::{Menu, MenuItem, MenuSection, MenuStyle, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Reload,
    SeeValues,
    KpForecast,
    Weather,
    About,
}

impl MenuAction {
    pub const ALL: [MenuAction; 5] = [
        MenuAction::Reload,
        MenuAction::SeeValues,
        MenuAction::KpForecast,
        MenuAction::Weather,
        MenuAction::About,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Reload => "Reload",
            Self::SeeValues => "See Values",
            Self::KpForecast => "Kp Forecast",
            Self::Weather => "Weather",
            Self::About => "About this app",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Self::Reload => "Reload data",
            Self::SeeValues => "See raw values",
            Self::KpForecast => "3 day Kp forecast",
            Self::Weather => "Current weather",
            Self::About => "Show info about this watchapp",
        }
    }

    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.title() == title)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// What a menu selection asks of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// The caller should start a manual refresh
    ReloadRequested,
    Shown,
    /// Nothing to show, e.g. no data yet or the view failed to render
    Skipped,
}

pub fn main_menu() -> Menu {
    Menu {
        style: MenuStyle::inverted(),
        sections: vec![MenuSection {
            title: None,
            items: MenuAction::ALL
                .iter()
                .map(|a| MenuItem {
                    title: a.title().to_string(),
                    subtitle: Some(a.subtitle().to_string()),
                })
                .collect(),
        }],
    }
}

/// One section per forecast date (`DD/MM`, local), each listing its windows
/// as `HH:MM-HH:MM - value` in UTC.
pub fn forecast_menu(snapshot: &DataSnapshot, zone: &FixedOffset) -> Result<Menu, RenderError> {
    let threeday = &snapshot.threeday;

    if threeday.values.len() > threeday.dates.len() {
        tracing::debug!(
            "forecast has {} window groups for {} dates; extra groups ignored",
            threeday.values.len(),
            threeday.dates.len()
        );
    }

    let mut sections = Vec::with_capacity(threeday.dates.len());
    for (index, raw_date) in threeday.dates.iter().enumerate() {
        let date = parse_timestamp(raw_date).ok_or_else(|| RenderError::InvalidTimestamp {
            field: "threeday date",
            raw: raw_date.clone(),
        })?;

        let mut items = Vec::new();
        for window in threeday.values.get(index).map(Vec::as_slice).unwrap_or_default() {
            let start = parse_timestamp(&window.start).ok_or_else(|| {
                RenderError::InvalidTimestamp {
                    field: "window start",
                    raw: window.start.clone(),
                }
            })?;
            let end = parse_timestamp(&window.end).ok_or_else(|| RenderError::InvalidTimestamp {
                field: "window end",
                raw: window.end.clone(),
            })?;

            items.push(MenuItem {
                title: format!(
                    "{}-{} - {}",
                    start.format("%H:%M"),
                    end.format("%H:%M"),
                    window.value
                ),
                subtitle: None,
            });
        }

        sections.push(MenuSection {
            title: Some(day_month(&date, zone)),
            items,
        });
    }

    Ok(Menu {
        style: MenuStyle::inverted(),
        sections,
    })
}

pub fn open_main_menu<S>(surface: &mut S)
where
    S: Surface + ?Sized,
{
    surface.show_menu(main_menu());
}

/// Act on a menu selection. Everything except Reload renders from the
/// existing snapshot without any network I/O.
pub fn dispatch<S>(
    action: MenuAction,
    snapshot: Option<&DataSnapshot>,
    zone: &FixedOffset,
    surface: &mut S,
) -> MenuOutcome
where
    S: Surface + ?Sized,
{
    tracing::debug!("menu selection: {}", action.title());

    match action {
        MenuAction::Reload => {
            surface.hide_menu();
            return MenuOutcome::ReloadRequested;
        }
        MenuAction::About => {
            surface.show_card(about_card());
            return MenuOutcome::Shown;
        }
        _ => {}
    }

    let Some(snapshot) = guard(action.title(), snapshot.ok_or(RenderError::NoSnapshot)) else {
        return MenuOutcome::Skipped;
    };

    let shown = match action {
        MenuAction::SeeValues => {
            surface.show_card(values_card(snapshot, zone));
            true
        }
        MenuAction::KpForecast => match guard(action.title(), forecast_menu(snapshot, zone)) {
            Some(menu) => {
                surface.show_menu(menu);
                true
            }
            None => false,
        },
        MenuAction::Weather => match guard(action.title(), weather_card(snapshot, zone)) {
            Some(card) => {
                surface.show_card(card);
                true
            }
            None => false,
        },
        MenuAction::Reload | MenuAction::About => true,
    };

    if shown {
        MenuOutcome::Shown
    } else {
        MenuOutcome::Skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn forecast_snapshot() -> DataSnapshot {
        serde_json::from_value(serde_json::json!({
            "threeday": {
                "dates": ["2024-03-01T00:00:00Z", "2024-03-02T00:00:00Z"],
                "values": [
                    [
                        {"start": "2024-03-01T00:00:00Z", "end": "2024-03-01T03:00:00Z", "value": "2.33"},
                        {"start": "2024-03-01T03:00:00Z", "end": "2024-03-01T06:00:00Z", "value": "4"}
                    ],
                    [
                        {"start": "2024-03-02T21:00:00Z", "end": "2024-03-03T00:00:00Z", "value": 5}
                    ]
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_main_menu_items() {
        let menu = main_menu();
        let titles: Vec<_> = menu.sections[0].items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Reload", "See Values", "Kp Forecast", "Weather", "About this app"]
        );
        assert_eq!(menu.style, MenuStyle::inverted());
    }

    #[test]
    fn test_action_lookup() {
        assert_eq!(MenuAction::from_title("Kp Forecast"), Some(MenuAction::KpForecast));
        assert_eq!(MenuAction::from_title("kp forecast"), None);
        assert_eq!(MenuAction::from_index(4), Some(MenuAction::About));
        assert_eq!(MenuAction::from_index(5), None);
    }

    #[test]
    fn test_forecast_menu_sections() {
        let menu = forecast_menu(&forecast_snapshot(), &utc()).unwrap();

        assert_eq!(menu.sections.len(), 2);
        assert_eq!(menu.sections[0].title.as_deref(), Some("01/03"));
        assert_eq!(menu.sections[0].items[0].title, "00:00-03:00 - 2.33");
        assert_eq!(menu.sections[0].items[1].title, "03:00-06:00 - 4");
        assert_eq!(menu.sections[1].title.as_deref(), Some("02/03"));
        assert_eq!(menu.sections[1].items[0].title, "21:00-00:00 - 5");
    }

    #[test]
    fn test_forecast_windows_stay_in_utc() {
        let zone = FixedOffset::east_opt(10 * 3600).unwrap();
        let menu = forecast_menu(&forecast_snapshot(), &zone).unwrap();

        assert_eq!(menu.sections[1].title.as_deref(), Some("02/03"));
        assert_eq!(menu.sections[0].items[0].title, "00:00-03:00 - 2.33");
    }

    #[test]
    fn test_forecast_menu_bad_date() {
        let mut snapshot = forecast_snapshot();
        snapshot.threeday.dates[1] = "not a date".into();
        assert!(forecast_menu(&snapshot, &utc()).is_err());
    }

    #[test]
    fn test_reload_hides_menu() {
        let mut surface = HeadlessSurface::new();
        open_main_menu(&mut surface);
        assert!(surface.is_menu_open());

        let outcome = dispatch(MenuAction::Reload, None, &utc(), &mut surface);

        assert_eq!(outcome, MenuOutcome::ReloadRequested);
        assert!(!surface.is_menu_open());
    }

    #[test]
    fn test_views_without_snapshot_are_skipped() {
        let mut surface = HeadlessSurface::new();

        for action in [MenuAction::SeeValues, MenuAction::KpForecast, MenuAction::Weather] {
            assert_eq!(dispatch(action, None, &utc(), &mut surface), MenuOutcome::Skipped);
        }
        assert!(surface.cards().is_empty());
        assert!(surface.menus().is_empty());
    }

    #[test]
    fn test_about_needs_no_snapshot() {
        let mut surface = HeadlessSurface::new();
        assert_eq!(
            dispatch(MenuAction::About, None, &utc(), &mut surface),
            MenuOutcome::Shown
        );
        assert_eq!(surface.last_card().unwrap().title, "Auroras.live");
    }

    #[test]
    fn test_broken_weather_is_guarded() {
        let mut surface = HeadlessSurface::new();
        let snapshot = forecast_snapshot();

        let outcome = dispatch(MenuAction::Weather, Some(&snapshot), &utc(), &mut surface);

        assert_eq!(outcome, MenuOutcome::Skipped);
        assert!(surface.cards().is_empty());
    }

    #[test]
    fn test_forecast_is_shown() {
        let mut surface = HeadlessSurface::new();
        let snapshot = forecast_snapshot();

        let outcome = dispatch(MenuAction::KpForecast, Some(&snapshot), &utc(), &mut surface);

        assert_eq!(outcome, MenuOutcome::Shown);
        assert_eq!(surface.last_menu().unwrap().sections.len(), 2);
    }
}
