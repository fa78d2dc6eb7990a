//! Maps world queries to frame snapshots and formats them as text.

use glam::Vec2;
use rampart_core::{GameState, TowerKind, UpgradeStat};
use rampart_rendering::{
    enemy_color, tower_color, BoardPresentation, ButtonPresentation, DecalPresentation,
    EnemyPresentation, FrameSnapshot, HudPresentation, RectPresentation, RenderingError,
    TilePresentation, TowerPresentation,
};
use rampart_world::layout::HitRegion;
use rampart_world::path::{MAP_COLUMNS, MAP_ORIGIN, MAP_ROWS, TILE_LENGTH};
use rampart_world::{query, World, ENEMY_EXTENT, HELP_PAGE_COUNT};

use rampart_rendering::Color;

const GRASS_COLOR: Color = Color::from_rgb_u8(0x3a, 0x6b, 0x2a);
const PATH_COLOR: Color = Color::from_rgb_u8(0x8a, 0x7d, 0x6b);

/// Assembles the frame snapshot for the world's current state.
pub(crate) fn snapshot(world: &World) -> Result<FrameSnapshot, RenderingError> {
    let frame = match query::game_state(world) {
        GameState::Menu => FrameSnapshot::Menu {
            buttons: buttons(
                world,
                &[
                    (HitRegion::Start, "Start"),
                    (HitRegion::Help, "Help"),
                    (HitRegion::Quit, "Quit"),
                ],
            ),
        },
        GameState::Help => FrameSnapshot::Help {
            page: query::help_page(world),
            page_count: HELP_PAGE_COUNT,
            buttons: buttons(
                world,
                &[
                    (HitRegion::PrevPage, "<"),
                    (HitRegion::NextPage, ">"),
                    (HitRegion::Back, "Back"),
                ],
            ),
        },
        GameState::InGame => FrameSnapshot::Playing {
            board: board(world)?,
        },
        GameState::Paused => FrameSnapshot::Paused {
            board: board(world)?,
            buttons: buttons(
                world,
                &[
                    (HitRegion::Resume, "Resume"),
                    (HitRegion::MainMenu, "Main menu"),
                ],
            ),
        },
        GameState::Cleared => FrameSnapshot::Cleared {
            board: board(world)?,
            wave: query::wave(world).get(),
            buttons: buttons(world, &[(HitRegion::Continue, "Continue")]),
        },
    };
    Ok(frame)
}

fn buttons(world: &World, entries: &[(HitRegion, &str)]) -> Vec<ButtonPresentation> {
    let layout = query::layout(world);
    entries
        .iter()
        .filter_map(|(region, label)| {
            layout
                .region_rect(*region)
                .map(|rect| ButtonPresentation::new(*label, RectPresentation::from_rect(rect)))
        })
        .collect()
}

fn board(world: &World) -> Result<BoardPresentation, RenderingError> {
    let tiles = query::tile_view(world)
        .into_iter()
        .map(|tile| TilePresentation {
            rect: RectPresentation::from_rect(tile.rect),
            color: if tile.kind == rampart_world::path::TileKind::Grass {
                GRASS_COLOR
            } else {
                PATH_COLOR
            },
            highlighted: tile.selected,
        })
        .collect();

    let mut enemies = Vec::new();
    for snapshot in query::enemy_view(world).iter() {
        let fraction =
            snapshot.health.get() as f32 / snapshot.kind.max_health().get().max(1) as f32;
        enemies.push(EnemyPresentation::new(
            Vec2::new(snapshot.position.x, snapshot.position.y),
            ENEMY_EXTENT,
            enemy_color(snapshot.kind),
            fraction,
        )?);
    }

    let towers = query::tower_view(world)
        .iter()
        .map(|snapshot| TowerPresentation {
            center: Vec2::new(snapshot.center.x, snapshot.center.y),
            range: snapshot.range,
            color: tower_color(snapshot.kind),
            cooling: snapshot.cooling,
        })
        .collect();

    let decals = query::decal_view(world)
        .into_iter()
        .map(|snapshot| DecalPresentation {
            position: Vec2::new(snapshot.position.x, snapshot.position.y),
            amount: snapshot.amount,
        })
        .collect();

    let mut panel = Vec::new();
    for kind in TowerKind::ALL {
        panel.extend(buttons(
            world,
            &[(
                HitRegion::TowerOption(kind),
                match kind {
                    TowerKind::Fire => "Fire",
                    TowerKind::Ice => "Ice",
                    TowerKind::Earth => "Earth",
                },
            )],
        ));
    }
    for stat in UpgradeStat::ALL {
        panel.extend(buttons(
            world,
            &[(
                HitRegion::Upgrade(stat),
                match stat {
                    UpgradeStat::Damage => "Damage+",
                    UpgradeStat::Range => "Range+",
                    UpgradeStat::Rate => "Rate+",
                },
            )],
        ));
    }

    Ok(BoardPresentation {
        tiles,
        enemies,
        towers,
        decals,
        panel,
        hud: HudPresentation {
            score: query::score(world),
            wave: query::wave(world).get(),
            pending_spawns: query::pending_spawns(world),
        },
        tooltip: query::tooltip(world),
    })
}

/// Formats the frame as terminal text.
pub(crate) fn render_text(frame: &FrameSnapshot) -> String {
    match frame {
        FrameSnapshot::Menu { buttons } => {
            format!("== Rampart ==\n{}", button_row(buttons))
        }
        FrameSnapshot::Help {
            page,
            page_count,
            buttons,
        } => format!(
            "Help page {}/{}\n{}",
            page + 1,
            page_count,
            button_row(buttons)
        ),
        FrameSnapshot::Playing { board } => board_text(board, None),
        FrameSnapshot::Paused { board, .. } => board_text(board, Some("-- paused --")),
        FrameSnapshot::Cleared { board, wave, .. } => {
            board_text(board, Some(&format!("wave {wave} cleared")))
        }
    }
}

fn button_row(buttons: &[ButtonPresentation]) -> String {
    buttons
        .iter()
        .map(|button| format!("[{}]", button.label))
        .collect::<Vec<_>>()
        .join(" ")
}

fn board_text(board: &BoardPresentation, banner: Option<&str>) -> String {
    let mut cells = [['.'; MAP_COLUMNS]; MAP_ROWS];
    for (index, tile) in board.tiles.iter().enumerate() {
        if tile.color == PATH_COLOR {
            cells[index / MAP_COLUMNS][index % MAP_COLUMNS] = '#';
        }
    }
    for tower in &board.towers {
        if let Some((column, row)) = cell_of(tower.center) {
            cells[row][column] = 'T';
        }
    }
    for enemy in &board.enemies {
        if let Some((column, row)) = cell_of(enemy.center) {
            cells[row][column] = 'e';
        }
    }

    let mut lines = vec![format!(
        "score {}  wave {}  pending {}",
        board.hud.score, board.hud.wave, board.hud.pending_spawns
    )];
    if let Some(banner) = banner {
        lines.push(banner.to_owned());
    }
    for row in &cells {
        lines.push(row.iter().collect());
    }
    if let Some(tooltip) = &board.tooltip {
        lines.push(format!("({tooltip})"));
    }
    lines.join("\n")
}

fn cell_of(point: Vec2) -> Option<(usize, usize)> {
    let column = (point.x - MAP_ORIGIN.x) / TILE_LENGTH;
    let row = (point.y - MAP_ORIGIN.y) / TILE_LENGTH;
    if column < 0.0 || row < 0.0 {
        return None;
    }
    let column = column as usize;
    let row = row as usize;
    if column >= MAP_COLUMNS || row >= MAP_ROWS {
        return None;
    }
    Some((column, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{Command, Position};
    use rampart_world::apply;

    fn started_world() -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        let start = query::layout(&world)
            .region_rect(HitRegion::Start)
            .expect("start button")
            .center();
        apply(&mut world, Command::Click { point: start }, &mut events);
        world
    }

    #[test]
    fn menu_snapshot_lists_the_three_buttons() {
        let world = World::new();
        match snapshot(&world).expect("snapshot") {
            FrameSnapshot::Menu { buttons } => {
                let labels: Vec<_> = buttons.iter().map(|button| button.label.as_str()).collect();
                assert_eq!(labels, vec!["Start", "Help", "Quit"]);
            }
            other => panic!("expected menu frame, got {other:?}"),
        }
    }

    #[test]
    fn playing_snapshot_carries_the_full_board() {
        let world = started_world();
        match snapshot(&world).expect("snapshot") {
            FrameSnapshot::Playing { board } => {
                assert_eq!(board.tiles.len(), MAP_COLUMNS * MAP_ROWS);
                assert_eq!(board.panel.len(), 6);
                assert_eq!(board.hud.score, rampart_world::STARTING_SCORE);
            }
            other => panic!("expected playing frame, got {other:?}"),
        }
    }

    #[test]
    fn board_text_draws_the_path_and_hud() {
        let mut world = started_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Hover {
                point: Position::new(0.0, 0.0),
            },
            &mut events,
        );
        let text = render_text(&snapshot(&world).expect("snapshot"));
        assert!(text.starts_with("score 20  wave 1"));
        assert!(text.contains('#'), "path tiles should be drawn");
    }
}
