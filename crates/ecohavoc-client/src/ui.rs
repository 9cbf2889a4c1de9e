//! UI rendering for the Eco Havoc client.
//!
//! HUD overlay, toast notifications, floating gains, chapter banners,
//! the damage flash, and the five action panels with their buttons.

use bevy::prelude::*;
use bevy::ui::FocusPolicy;
use ecohavoc_core::presenter::{HudSnapshot, PanelData};
use ecohavoc_logic::atmosphere::PollutionStatus;
use ecohavoc_logic::events::Panel;

use crate::rendering::hex;
use crate::state::{
    BannerRoot, DamageFlash, FloatingPopup, Game, HudText, Lifetime, PanelAction, PanelRoot,
    PanelUpdate, PollutionBarFill, ScannerText, ToastText, UiFeed, ViewState, XpBarFill,
};

const TOAST_SECONDS: f32 = 2.5;
const BANNER_SECONDS: f32 = 6.0;
const POPUP_SECONDS: f32 = 1.5;
const POPUP_RISE_PX: f32 = 60.0;
const MAX_POPUPS: usize = 6;
const FLASH_SECONDS: f32 = 0.3;

const NEON: Color = Color::srgb(0.0, 1.0, 0.39);
const PANEL_BG: Color = Color::srgba(0.0, 0.06, 0.02, 0.92);
const BUTTON_BG: Color = Color::srgba(0.0, 0.2, 0.08, 0.9);
const BUTTON_HOVER: Color = Color::srgba(0.0, 0.35, 0.14, 0.95);

fn text(content: impl Into<String>, size: f32, color: Color) -> (Text, TextFont, TextColor) {
    (
        Text::new(content),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

fn bar(parent: &mut ChildBuilder, fill_color: Color, marker: impl Component) {
    parent
        .spawn((
            Node {
                width: Val::Px(180.0),
                height: Val::Px(8.0),
                margin: UiRect::vertical(Val::Px(3.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.1)),
        ))
        .with_children(|track| {
            track.spawn((
                Node {
                    width: Val::Percent(0.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(fill_color),
                marker,
            ));
        });
}

pub fn setup_ui(mut commands: Commands) {
    // HUD (top-left)
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(12.0),
                top: Val::Px(12.0),
                padding: UiRect::all(Val::Px(8.0)),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
        ))
        .with_children(|hud| {
            hud.spawn((text("", 14.0, Color::WHITE), HudText));
            bar(hud, NEON, XpBarFill);
            bar(hud, Color::srgb(0.9, 0.35, 0.1), PollutionBarFill);
            hud.spawn((text("", 12.0, Color::srgb(0.6, 1.0, 0.8)), ScannerText));
        });

    // Controls hint (bottom-left)
    commands.spawn((
        text(
            "WASD move · click to look · E collect · R sort · C city · K skills · F facts · B economy · M map · Esc close",
            12.0,
            Color::srgba(0.7, 0.9, 0.75, 0.7),
        ),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            bottom: Val::Px(12.0),
            ..default()
        },
    ));

    // Crosshair
    commands.spawn((
        text("+", 20.0, Color::srgba(0.0, 1.0, 0.4, 0.6)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            top: Val::Percent(50.0),
            ..default()
        },
    ));

    // Toast (top-center)
    commands.spawn((
        text("", 16.0, Color::srgb(1.0, 0.9, 0.3)),
        TextLayout::new_with_justify(JustifyText::Center),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(25.0),
            right: Val::Percent(25.0),
            top: Val::Px(16.0),
            ..default()
        },
        ZIndex(20),
        ToastText { remaining: 0.0 },
    ));

    // Full-screen damage flash
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::srgba(1.0, 0.0, 0.0, 0.0)),
        FocusPolicy::Pass,
        ZIndex(30),
        DamageFlash { remaining: 0.0 },
    ));
}

fn hud_line(hud: &HudSnapshot) -> String {
    format!(
        "💰 {} credits   ⭐ Lv {}   🏆 {}\n\
         XP {}/{}   🎯 {} SP   ♻️ {} collected\n\
         ☁️ Pollution {}%  {}\n\
         📖 Ch.{} {}\n\
         {} {} · {} people · {}\n\
         🗑 {} waste left",
        hud.credits,
        hud.level,
        hud.score,
        hud.xp,
        hud.xp_next,
        hud.skill_points,
        hud.waste_collected,
        hud.pollution,
        hud.pollution_status.label(),
        hud.chapter,
        hud.chapter_title,
        hud.district_icon,
        hud.district_name,
        hud.district_population,
        hud.district_tonnage,
        hud.waste_remaining,
    )
}

fn scanner_line(hud: &HudSnapshot) -> String {
    match &hud.nearby {
        None => String::new(),
        Some(counts) if counts.is_empty() => "🔬 Scanner: nothing nearby".into(),
        Some(counts) => {
            let parts: Vec<String> = counts
                .iter()
                .map(|(c, n)| format!("{} {}×{}", c.glyph(), c.label(), n))
                .collect();
            format!("🔬 Scanner: {}", parts.join("  "))
        }
    }
}

fn pollution_color(status: PollutionStatus) -> Color {
    match status {
        PollutionStatus::Clean => NEON,
        PollutionStatus::InProgress => Color::srgb(1.0, 0.67, 0.0),
        PollutionStatus::Critical => Color::srgb(1.0, 0.2, 0.2),
    }
}

pub fn render_hud(
    mut feed: ResMut<UiFeed>,
    mut text_q: Query<&mut Text, (With<HudText>, Without<ScannerText>)>,
    mut scanner_q: Query<&mut Text, (With<ScannerText>, Without<HudText>)>,
    mut xp_q: Query<&mut Node, (With<XpBarFill>, Without<PollutionBarFill>)>,
    mut pollution_q: Query<(&mut Node, &mut BackgroundColor), (With<PollutionBarFill>, Without<XpBarFill>)>,
) {
    let Some(hud) = feed.hud.take() else {
        return;
    };
    if let Ok(mut text) = text_q.get_single_mut() {
        **text = hud_line(&hud);
    }
    if let Ok(mut text) = scanner_q.get_single_mut() {
        **text = scanner_line(&hud);
    }
    if let Ok(mut node) = xp_q.get_single_mut() {
        node.width = Val::Percent(hud.xp_fraction() * 100.0);
    }
    if let Ok((mut node, mut color)) = pollution_q.get_single_mut() {
        node.width = Val::Percent(hud.pollution_fraction() * 100.0);
        color.0 = pollution_color(hud.pollution_status);
    }
}

/// Show the newest toast and hide it after a while. A new toast restarts the timer.
pub fn render_toasts(
    time: Res<Time>,
    mut feed: ResMut<UiFeed>,
    mut toast_q: Query<(&mut Text, &mut ToastText)>,
) {
    let Ok((mut text, mut toast)) = toast_q.get_single_mut() else {
        return;
    };
    if let Some(message) = feed.toast.take() {
        **text = message;
        toast.remaining = TOAST_SECONDS;
    } else if toast.remaining > 0.0 {
        toast.remaining -= time.delta_secs();
        if toast.remaining <= 0.0 {
            **text = String::new();
        }
    }
}

pub fn spawn_banner(
    mut commands: Commands,
    mut feed: ResMut<UiFeed>,
    existing: Query<Entity, With<BannerRoot>>,
) {
    let Some((title, body)) = feed.banner.take() else {
        return;
    };
    for entity in existing.iter() {
        commands.entity(entity).despawn_recursive();
    }
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Percent(20.0),
                right: Val::Percent(20.0),
                top: Val::Percent(30.0),
                padding: UiRect::all(Val::Px(20.0)),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.05, 0.02, 0.85)),
            BorderColor(NEON),
            ZIndex(25),
            BannerRoot,
            Lifetime(BANNER_SECONDS),
        ))
        .with_children(|banner| {
            banner.spawn(text(title, 26.0, NEON));
            banner.spawn((
                text(body, 15.0, Color::srgb(0.85, 0.95, 0.88)),
                TextLayout::new_with_justify(JustifyText::Center),
            ));
        });
}

pub fn spawn_popups(
    mut commands: Commands,
    mut feed: ResMut<UiFeed>,
    existing: Query<(Entity, &FloatingPopup)>,
) {
    if feed.popups.is_empty() {
        return;
    }
    let incoming = std::mem::take(&mut feed.popups);

    // keep at most MAX_POPUPS on screen, dropping the oldest
    let mut alive: Vec<(Entity, f32)> = existing.iter().map(|(e, p)| (e, p.remaining)).collect();
    alive.sort_by(|a, b| a.1.total_cmp(&b.1));
    let overflow = (alive.len() + incoming.len()).saturating_sub(MAX_POPUPS);
    for (entity, _) in alive.iter().take(overflow) {
        commands.entity(*entity).despawn_recursive();
    }

    for (x, y, message) in incoming.into_iter().rev().take(MAX_POPUPS) {
        commands.spawn((
            text(message, 22.0, NEON),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Percent(x * 100.0 - 5.0),
                top: Val::Percent(y * 100.0),
                ..default()
            },
            ZIndex(22),
            FloatingPopup {
                remaining: POPUP_SECONDS,
            },
        ));
    }
}

/// Rise and fade floating gains; count down lifetimes; fade the damage flash.
pub fn tick_overlays(
    mut commands: Commands,
    time: Res<Time>,
    mut feed: ResMut<UiFeed>,
    mut popups: Query<(Entity, &mut FloatingPopup, &mut Node, &mut TextColor)>,
    mut lifetimes: Query<(Entity, &mut Lifetime)>,
    mut flash_q: Query<(&mut DamageFlash, &mut BackgroundColor)>,
) {
    let dt = time.delta_secs();

    for (entity, mut popup, mut node, mut color) in popups.iter_mut() {
        popup.remaining -= dt;
        if popup.remaining <= 0.0 {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        let t = popup.remaining / POPUP_SECONDS;
        node.margin.top = Val::Px(-(1.0 - t) * POPUP_RISE_PX);
        color.0 = NEON.with_alpha(t);
    }

    for (entity, mut life) in lifetimes.iter_mut() {
        life.0 -= dt;
        if life.0 <= 0.0 {
            commands.entity(entity).despawn_recursive();
        }
    }

    if let Ok((mut flash, mut bg)) = flash_q.get_single_mut() {
        if feed.flash {
            feed.flash = false;
            flash.remaining = FLASH_SECONDS;
        }
        if flash.remaining > 0.0 {
            flash.remaining = (flash.remaining - dt).max(0.0);
            bg.0 = Color::srgba(1.0, 0.0, 0.0, 0.35 * flash.remaining / FLASH_SECONDS);
        }
    }
}

// ============================================================================
// PANELS
// ============================================================================

fn button(parent: &mut ChildBuilder, label: impl Into<String>, action: PanelAction, highlight: Option<Color>) {
    parent
        .spawn((
            Button,
            Node {
                padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                margin: UiRect::all(Val::Px(3.0)),
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(BUTTON_BG),
            BorderColor(highlight.unwrap_or(Color::srgba(0.0, 1.0, 0.4, 0.3))),
            action,
        ))
        .with_children(|b| {
            b.spawn(text(label, 14.0, Color::WHITE));
        });
}

fn row(parent: &mut ChildBuilder, build: impl FnOnce(&mut ChildBuilder)) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::Wrap,
            ..default()
        })
        .with_children(build);
}

fn panel_body(parent: &mut ChildBuilder, data: &PanelData) {
    let dim = Color::srgb(0.7, 0.85, 0.75);
    match data {
        PanelData::Sorting(panel) => {
            parent.spawn(text("Pick an item, then its bin:", 14.0, dim));
            row(parent, |r| {
                for option in &panel.options {
                    let highlight = if option.selected {
                        Some(Color::srgb(1.0, 0.9, 0.3))
                    } else if option.hinted {
                        Some(Color::srgb(0.3, 0.8, 1.0))
                    } else {
                        None
                    };
                    button(
                        r,
                        format!("{} {}", option.glyph, option.name),
                        PanelAction::SelectWaste(option.key),
                        highlight,
                    );
                }
            });
            row(parent, |r| {
                for bin in panel.bins {
                    button(
                        r,
                        format!("{} {}", bin.glyph(), bin.label()),
                        PanelAction::Bin(bin),
                        Some(hex(bin.world_color())),
                    );
                }
            });
            if let Some(feedback) = &panel.feedback {
                parent.spawn(text(feedback.clone(), 15.0, Color::WHITE));
            }
            if let Some(fact) = panel.fact {
                parent.spawn(text(format!("💡 {}", fact), 13.0, dim));
            }
            parent.spawn(text(format!("Sort score: {}", panel.sort_score), 13.0, dim));
            row(parent, |r| button(r, "🔄 New item", PanelAction::NewRound, None));
        }
        PanelData::City(cards) => {
            for card in cards {
                let current = if card.current { "  ◀ you are here" } else { "" };
                let label = format!(
                    "{} {}  ☁️{}%  ✨{}% clean  {}{}",
                    card.icon,
                    card.name,
                    card.base_pollution,
                    card.clean,
                    card.status.label(),
                    current
                );
                button(parent, label, PanelAction::District(card.index), Some(hex(card.color)));
            }
        }
        PanelData::Skills(panel) => {
            parent.spawn(text(format!("Skill points: {}", panel.skill_points), 14.0, dim));
            for card in &panel.cards {
                let state = if card.unlocked {
                    "✅ ACTIVE".to_string()
                } else {
                    format!("{} SP", card.cost)
                };
                let label = format!("{} {} ({})\n{}", card.icon, card.name, state, card.description);
                button(parent, label, PanelAction::UnlockSkill(card.id), card.unlocked.then_some(NEON));
            }
        }
        PanelData::EcoFacts(facts) => {
            for fact in facts.iter() {
                parent.spawn(text(fact.title, 15.0, NEON));
                parent.spawn(text(fact.body, 13.0, dim));
            }
        }
        PanelData::Economy(panel) => {
            parent.spawn(text(format!("💰 {} credits", panel.credits), 15.0, Color::WHITE));
            for card in &panel.assets {
                let a = card.asset;
                let label = format!(
                    "{} {} · {} credits (owned {})\n{}",
                    a.icon(),
                    a.name(),
                    a.cost(),
                    card.owned,
                    a.description()
                );
                let highlight = (!card.affordable).then_some(Color::srgb(0.6, 0.2, 0.2));
                button(parent, label, PanelAction::Build(a), highlight);
            }
            let quotes: Vec<String> = panel
                .market
                .quotes
                .iter()
                .map(|(c, p)| format!("{} {}/t", c.glyph(), p))
                .collect();
            parent.spawn(text(format!("📈 {}", quotes.join("  ")), 13.0, dim));
        }
    }
}

/// Replace the on-screen panel with the newest rebuild, or remove it.
pub fn render_panel(
    mut commands: Commands,
    mut feed: ResMut<UiFeed>,
    mut view: ResMut<ViewState>,
    existing: Query<Entity, With<PanelRoot>>,
) {
    let Some(update) = feed.panel.take() else {
        return;
    };
    for entity in existing.iter() {
        commands.entity(entity).despawn_recursive();
    }
    let PanelUpdate::Show(panel, data) = update else {
        view.panel_open = false;
        return;
    };
    view.panel_open = true;

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(12.0),
                top: Val::Px(12.0),
                width: Val::Px(440.0),
                max_height: Val::Percent(75.0),
                padding: UiRect::all(Val::Px(12.0)),
                flex_direction: FlexDirection::Column,
                border: UiRect::all(Val::Px(1.0)),
                overflow: Overflow::clip_y(),
                ..default()
            },
            BackgroundColor(PANEL_BG),
            BorderColor(NEON),
            ZIndex(15),
            PanelRoot,
        ))
        .with_children(|root| {
            row(root, |r| {
                r.spawn((
                    text(panel.title(), 18.0, NEON),
                    Node {
                        flex_grow: 1.0,
                        ..default()
                    },
                ));
                button(r, "✖", PanelAction::Close, None);
            });
            panel_body(root, &data);
        });
}

/// Hover feedback and dispatch of panel button presses to the engine.
pub fn panel_buttons(
    mut game: ResMut<Game>,
    mut feed: ResMut<UiFeed>,
    mut view: ResMut<ViewState>,
    mut buttons: Query<
        (&Interaction, &PanelAction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
) {
    for (interaction, action, mut bg) in buttons.iter_mut() {
        match interaction {
            Interaction::Hovered => bg.0 = BUTTON_HOVER,
            Interaction::None => bg.0 = BUTTON_BG,
            Interaction::Pressed => {
                let feed = &mut *feed;
                // rejections are already shown as notices
                let _ = match *action {
                    PanelAction::SelectWaste(key) => game.0.select_sorting_candidate(key, feed),
                    PanelAction::Bin(bin) => game.0.resolve_bin_choice(bin, feed).map(|_| ()),
                    PanelAction::NewRound => {
                        game.0.request_new_sorting_round(feed);
                        Ok(())
                    }
                    PanelAction::District(index) => game.0.set_current_district(index, feed),
                    PanelAction::UnlockSkill(id) => game.0.unlock_skill(id, feed),
                    PanelAction::Build(asset) => game.0.build_economy_asset(asset, feed),
                    PanelAction::Close => {
                        game.0.close_panels(feed);
                        view.panel_open = false;
                        Ok(())
                    }
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecohavoc_core::prelude::*;
    use ecohavoc_logic::catalog::WasteCategory;

    fn snapshot() -> HudSnapshot {
        let engine = GameEngine::new(GameConfig::default(), 5);
        engine.hud_snapshot()
    }

    #[test]
    fn hud_line_shows_district_and_pollution() {
        let hud = snapshot();
        let line = hud_line(&hud);
        assert!(line.contains(hud.district_name));
        assert!(line.contains("Pollution 70%"));
        assert!(line.contains("500 credits"));
    }

    #[test]
    fn scanner_hidden_without_skill() {
        let hud = snapshot();
        assert!(hud.nearby.is_none());
        assert_eq!(scanner_line(&hud), "");
    }

    #[test]
    fn scanner_lists_counts() {
        let mut hud = snapshot();
        hud.nearby = Some(vec![(WasteCategory::Metal, 2)]);
        assert!(scanner_line(&hud).contains("×2"));
        hud.nearby = Some(Vec::new());
        assert!(scanner_line(&hud).contains("nothing nearby"));
    }

    #[test]
    fn panel_titles_distinct() {
        let mut titles: Vec<_> = Panel::ALL.iter().map(|p| p.title()).collect();
        titles.dedup();
        assert_eq!(titles.len(), 5);
    }
}
