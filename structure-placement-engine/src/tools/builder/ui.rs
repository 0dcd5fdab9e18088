use bevy::prelude::*;

use constants::render_settings::{BUTTON_ACTIVE, BUTTON_IDLE};

use crate::structures::CatalogHandle;
use crate::structures::catalog::StructureCatalog;
use crate::tools::mode::ModeManager;

use super::state::*;

pub fn button_colour(rgb: [f32; 3]) -> Color {
    Color::srgb(rgb[0], rgb[1], rgb[2])
}

// Spawns the Structure Builder UI panel with header and buttons
pub fn spawn_builder_ui(mut commands: Commands, state: Res<BuilderPanelState>) {
    let width = if state.collapsed { state.closed_width } else { state.open_width };
    let body_display = if state.collapsed { Display::None } else { Display::Flex };

    commands
        .spawn((
            BuilderPanelRoot,
            Name::new("BuilderPanel"),
            BackgroundColor(Color::srgb(0.10, 0.11, 0.13)),
            Node {
                width: Val::Px(width),
                min_width: Val::Px(0.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                bottom: Val::Px(0.0),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Stretch,
                justify_content: JustifyContent::FlexStart,
                overflow: Overflow::clip(),
                ..default()
            },
        ))
        .with_children(|parent| {
            let (pad, btn) = if state.collapsed { (4.0, 24.0) } else { (12.0, 28.0) };

            parent
                .spawn((
                    HeaderNode,
                    Name::new("Header"),
                    BackgroundColor(Color::srgb(0.14, 0.16, 0.20)),
                    Node {
                        width: Val::Percent(100.0),
                        padding: UiRect::all(Val::Px(pad)),
                        display: Display::Flex,
                        align_items: AlignItems::Center,
                        justify_content: if state.collapsed { JustifyContent::FlexEnd } else { JustifyContent::SpaceBetween },
                        ..default()
                    },
                ))
                .with_children(|header| {
                    header.spawn((
                        TitleText,
                        Name::new("Title"),
                        Text::new("Structure Builder"),
                        TextFont { font_size: 18.0, ..default() },
                        TextColor(Color::srgb(1.0, 1.0, 1.0)),
                        Node { display: if state.collapsed { Display::None } else { Display::Flex }, ..default() },
                    ));

                    let chevron = if state.collapsed { ">" } else { "<" };
                    header
                        .spawn((
                            CollapseButton,
                            Name::new("CollapseButton"),
                            Button,
                            BackgroundColor(button_colour(BUTTON_IDLE)),
                            BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                            Node {
                                width: Val::Px(btn),
                                height: Val::Px(btn),
                                display: Display::Flex,
                                align_items: AlignItems::Center,
                                justify_content: JustifyContent::Center,
                                border: UiRect::all(Val::Px(1.0)),
                                ..default()
                            },
                        ))
                        .with_children(|btn_parent| {
                            btn_parent.spawn((
                                CollapseLabel,
                                Text::new(chevron),
                                TextFont { font_size: 18.0, ..default() },
                                TextColor(Color::srgb(1.0, 1.0, 1.0)),
                            ));
                        });
                });

            parent
                .spawn((
                    BuilderPanelBody,
                    Name::new("Body"),
                    BackgroundColor(Color::srgb(0.12, 0.13, 0.15)),
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(8.0)),
                        row_gap: Val::Px(8.0),
                        column_gap: Val::Px(8.0),
                        display: body_display,
                        flex_direction: FlexDirection::Column,
                        overflow: Overflow::clip_y(),
                        ..default()
                    },
                ))
                .with_children(|body| {
                    // Mode toggle
                    body.spawn((
                        ModeToggleButton,
                        Button,
                        Name::new("ModeToggleButton"),
                        BackgroundColor(button_colour(BUTTON_IDLE)),
                        BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Px(36.0),
                            display: Display::Flex,
                            align_items: AlignItems::Center,
                            justify_content: JustifyContent::Center,
                            border: UiRect::all(Val::Px(1.0)),
                            ..default()
                        },
                    ))
                    .with_children(|btn| {
                        btn.spawn((
                            ModeToggleLabel,
                            Text::new("Mode: map"),
                            TextFont { font_size: 16.0, ..default() },
                            TextColor(Color::srgb(1.0, 1.0, 1.0)),
                        ));
                    });

                    // Template buttons land here once the catalog loads
                    body.spawn((
                        TemplateList,
                        Name::new("TemplateList"),
                        Node {
                            width: Val::Percent(100.0),
                            display: Display::Flex,
                            flex_direction: FlexDirection::Column,
                            row_gap: Val::Px(6.0),
                            ..default()
                        },
                    ));

                    // Clear All
                    body.spawn((
                        ClearAllButton,
                        Button,
                        Name::new("ClearAllButton"),
                        BackgroundColor(Color::srgb(0.28, 0.10, 0.10)),
                        BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Px(36.0),
                            display: Display::Flex,
                            align_items: AlignItems::Center,
                            justify_content: JustifyContent::Center,
                            border: UiRect::all(Val::Px(1.0)),
                            ..default()
                        },
                    ))
                    .with_children(|btn| {
                        btn.spawn((
                            Text::new("Clear All Structures"),
                            TextFont { font_size: 16.0, ..default() },
                            TextColor(Color::srgb(1.0, 1.0, 1.0)),
                        ));
                    });
                });
        });

    // Status line, bottom-left overlay
    commands.spawn((
        StatusText,
        Name::new("StatusText"),
        Text::new(""),
        TextFont { font_size: 16.0, ..default() },
        TextColor(Color::srgb(0.9, 0.9, 0.9)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            bottom: Val::Px(12.0),
            ..default()
        },
    ));
}

// Fill the template list with one button per catalog entry
pub fn populate_template_buttons(
    handle: Option<Res<CatalogHandle>>,
    catalogs: Res<Assets<StructureCatalog>>,
    list: Query<Entity, With<TemplateList>>,
    mut commands: Commands,
    mut populated: Local<bool>,
) {
    if *populated {
        return;
    }
    let Some(handle) = handle else {
        return;
    };
    let Some(catalog) = catalogs.get(&handle.0) else {
        return;
    };
    let Ok(list_entity) = list.single() else {
        return;
    };

    commands.entity(list_entity).with_children(|list| {
        for template in &catalog.structures {
            list.spawn((
                TemplateButton(template.clone()),
                Button,
                Name::new(format!("{}_button", template.kind.as_str())),
                BackgroundColor(button_colour(BUTTON_IDLE)),
                BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Px(32.0),
                    display: Display::Flex,
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    border: UiRect::all(Val::Px(1.0)),
                    ..default()
                },
            ))
            .with_children(|btn| {
                btn.spawn((
                    Text::new(template.name.clone()),
                    TextFont { font_size: 15.0, ..default() },
                    TextColor(Color::srgb(1.0, 1.0, 1.0)),
                ));
            });
        }
    });

    *populated = true;
    info!("Builder catalog loaded: {} templates", catalog.structures.len());
}

pub fn apply_collapse_state(
    state: Res<BuilderPanelState>,
    mut nodes: ParamSet<(
        Query<&mut Node, With<BuilderPanelRoot>>,
        Query<&mut Node, With<BuilderPanelBody>>,
        Query<&mut Node, With<HeaderNode>>,
        Query<&mut Node, With<TitleText>>,
        Query<&mut Node, With<CollapseButton>>,
    )>,
    mut chevrons: Query<&mut Text, With<CollapseLabel>>,
) {
    if !state.is_changed() { return; }

    if let Ok(mut n) = nodes.p0().single_mut() {
        n.width = Val::Px(if state.collapsed { state.closed_width } else { state.open_width });
    }
    if let Ok(mut n) = nodes.p1().single_mut() {
        n.display = if state.collapsed { Display::None } else { Display::Flex };
    }
    if let Ok(mut n) = nodes.p2().single_mut() {
        let pad = if state.collapsed { 4.0 } else { 12.0 };
        n.padding = UiRect::all(Val::Px(pad));
        n.justify_content = if state.collapsed { JustifyContent::FlexEnd } else { JustifyContent::SpaceBetween };
    }
    if let Ok(mut n) = nodes.p3().single_mut() {
        n.display = if state.collapsed { Display::None } else { Display::Flex };
    }
    if let Ok(mut n) = nodes.p4().single_mut() {
        let s = if state.collapsed { 24.0 } else { 28.0 };
        n.width = Val::Px(s);
        n.height = Val::Px(s);
    }
    for mut t in &mut chevrons {
        *t = Text::new(if state.collapsed { ">" } else { "<" });
    }
}

// Keep the mode button label in step with the active mode
pub fn reflect_mode_toggle_label(
    mode_manager: Res<ModeManager>,
    mut q: Query<&mut Text, With<ModeToggleLabel>>,
) {
    if !mode_manager.is_changed() {
        return;
    }
    if let Ok(mut t) = q.single_mut() {
        let label = format!("Mode: {}", mode_manager.active_mode().as_str());
        if t.0 != label {
            *t = Text::new(label);
        }
    }
}

// Armed template button stays highlighted
pub fn reflect_armed_template(
    active: Res<ActiveTemplate>,
    mut buttons: Query<(&TemplateButton, &mut BackgroundColor, &Interaction)>,
) {
    if !active.is_changed() {
        return;
    }
    for (button, mut bg, interaction) in &mut buttons {
        if *interaction != Interaction::None {
            continue;
        }
        let armed = active
            .selected
            .as_ref()
            .is_some_and(|t| t.kind == button.0.kind);
        *bg = BackgroundColor(button_colour(if armed { BUTTON_ACTIVE } else { BUTTON_IDLE }));
    }
}

// Tick the status line down and clear it when its time is up
pub fn update_status_text(
    time: Res<Time>,
    mut status: ResMut<StatusMessage>,
    mut q: Query<&mut Text, With<StatusText>>,
) {
    let Ok(mut text) = q.single_mut() else {
        return;
    };

    if let Some(message) = status.text.clone() {
        status.remaining -= time.delta_secs();
        if status.remaining <= 0.0 {
            status.text = None;
            *text = Text::new("");
        } else if text.0 != message {
            *text = Text::new(message);
        }
    }
}
