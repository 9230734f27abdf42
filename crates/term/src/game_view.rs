//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! Pure (no I/O). The board is drawn on the left with every cell two columns
//! wide; the HUD and the current toast sit in a panel on the right.

use crate::core::GameSnapshot;
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::types::{BlockType, GameStatus, Notification};

const CELL_W: u16 = 2;
const PANEL_W: u16 = 30;
const PANEL_GAP: u16 = 2;
const OXYGEN_BAR_W: u16 = 20;

const BLACK: Rgb = Rgb::new(0, 0, 0);
const SHAFT: Rgb = Rgb::new(28, 22, 18);
const FRAME: Rgb = Rgb::new(150, 140, 130);
const TEXT: Rgb = Rgb::new(220, 220, 220);
const MUTED: Rgb = Rgb::new(130, 130, 140);
const ALERT: Rgb = Rgb::new(239, 68, 68);
const HIGHLIGHT: Rgb = Rgb::new(250, 204, 21);
const AIR: Rgb = Rgb::new(56, 189, 248);

fn block_color(block: BlockType) -> Rgb {
    match block {
        BlockType::Empty => SHAFT,
        BlockType::Green => Rgb::new(34, 197, 94),
        BlockType::Pink => Rgb::new(236, 72, 153),
        BlockType::Blue => Rgb::new(59, 130, 246),
        BlockType::Yellow => Rgb::new(234, 179, 8),
        BlockType::MultiHit => Rgb::new(120, 72, 40),
        BlockType::Pickup => AIR,
    }
}

/// Terminal size the view needs for a board, in columns and rows
pub fn required_size(board_width: u16, board_height: u16) -> (u16, u16) {
    let width = board_width
        .saturating_mul(CELL_W)
        .saturating_add(2 + PANEL_GAP + PANEL_W);
    let height = board_height.saturating_add(2).max(18);
    (width, height)
}

#[derive(Debug, Clone)]
pub struct GameView {
    show_help: bool,
}

impl Default for GameView {
    fn default() -> Self {
        Self::new()
    }
}

impl GameView {
    pub fn new() -> Self {
        Self { show_help: true }
    }

    pub fn with_help(mut self, show_help: bool) -> Self {
        self.show_help = show_help;
        self
    }

    /// Render `snap` (and an optional toast) into `fb`, resizing it to fit.
    pub fn render(&self, snap: &GameSnapshot, toast: Option<&Notification>, fb: &mut FrameBuffer) {
        let (width, height) = required_size(snap.grid.width(), snap.grid.height());
        fb.reset(width, height);

        self.draw_board(snap, fb);
        let panel_x = snap.grid.width() * CELL_W + 2 + PANEL_GAP;
        let y = self.draw_hud(snap, panel_x, fb);
        let y = self.draw_status(snap, toast, panel_x, y + 1, fb);
        if self.show_help {
            self.draw_help(panel_x, y + 1, fb);
        }
    }

    fn draw_board(&self, snap: &GameSnapshot, fb: &mut FrameBuffer) {
        let grid = &snap.grid;
        let inner_w = grid.width() * CELL_W;
        let frame = Style::new(FRAME, BLACK);

        fb.put(0, 0, '┌', frame);
        fb.put(inner_w + 1, 0, '┐', frame);
        fb.put(0, grid.height() + 1, '└', frame);
        fb.put(inner_w + 1, grid.height() + 1, '┘', frame);
        fb.fill(1, 0, inner_w, 1, '─', frame);
        fb.fill(1, grid.height() + 1, inner_w, 1, '─', frame);
        fb.fill(0, 1, 1, grid.height(), '│', frame);
        fb.fill(inner_w + 1, 1, 1, grid.height(), '│', frame);

        for pos in grid.positions() {
            let Some(cell) = grid.cell(pos) else {
                continue;
            };
            let x = 1 + pos.col * CELL_W;
            let y = 1 + pos.row;
            let bg = block_color(cell.block);
            let (text, fg) = match cell.block {
                BlockType::Empty => ("  ".to_string(), MUTED),
                BlockType::MultiHit => (format!("{:>2}", cell.hits), TEXT),
                BlockType::Pickup => ("O2".to_string(), BLACK),
                _ => ("  ".to_string(), bg),
            };
            fb.put_str(x, y, &text, Style::new(fg, bg));
        }

        let player = snap.player;
        let color = Rgb::from_array(player.character.color);
        let style = Style::new(TEXT, color).bold();
        fb.put_str(1 + player.col * CELL_W, 1 + player.row, "<>", style);
    }

    fn draw_hud(&self, snap: &GameSnapshot, x: u16, fb: &mut FrameBuffer) -> u16 {
        let text = Style::new(TEXT, BLACK);
        let muted = Style::new(MUTED, BLACK);
        let hud = &snap.hud;

        fb.put_str(x, 0, "DRILL MASTER", Style::new(HIGHLIGHT, BLACK).bold());
        let name_style = Style::new(Rgb::from_array(snap.player.character.color), BLACK);
        fb.put_str(x, 1, snap.player.character.name, name_style);

        fb.put_str(
            x,
            3,
            &format!("Depth   {}m / {}m", hud.depth, snap.target_depth),
            text,
        );

        let percent = snap.oxygen_percent();
        let oxygen_color = if percent <= 25 { ALERT } else { AIR };
        fb.put_str(x, 4, &format!("Oxygen  {}%", percent), text);
        let filled = (percent.min(100) as u16 * OXYGEN_BAR_W + 50) / 100;
        fb.fill(x, 5, filled, 1, '█', Style::new(oxygen_color, BLACK));
        fb.fill(x + filled, 5, OXYGEN_BAR_W - filled, 1, '░', muted);

        fb.put_str(x, 6, &format!("Score   {}", hud.score), text);
        fb.put_str(
            x,
            7,
            &format!("Level   {}   Lives {}", hud.level, hud.lives),
            text,
        );
        8
    }

    fn draw_status(
        &self,
        snap: &GameSnapshot,
        toast: Option<&Notification>,
        x: u16,
        mut y: u16,
        fb: &mut FrameBuffer,
    ) -> u16 {
        let banner = match snap.status {
            GameStatus::Playing => None,
            GameStatus::Paused => Some(("PAUSED", HIGHLIGHT)),
            GameStatus::GameOver => Some(("GAME OVER  (r to restart)", ALERT)),
            GameStatus::LevelComplete => Some(("LEVEL COMPLETE", HIGHLIGHT)),
        };
        if let Some((label, color)) = banner {
            fb.put_str(x, y, label, Style::new(color, BLACK).bold());
            y += 1;
        }

        if let Some(note) = toast {
            fb.put_str(x, y, note.title(), Style::new(HIGHLIGHT, BLACK).bold());
            fb.put_str(x, y + 1, &note.description(), Style::new(TEXT, BLACK));
            y += 2;
        }
        y
    }

    fn draw_help(&self, x: u16, y: u16, fb: &mut FrameBuffer) {
        let muted = Style::new(MUTED, BLACK);
        let lines = [
            "←/→ a/d  move",
            "↓ s space  drill",
            "p pause   r restart",
            "1-3 character   q quit",
        ];
        for (i, line) in lines.iter().enumerate() {
            fb.put_str(x, y + i as u16, line, muted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameState, Grid, Pos};
    use crate::types::RED_DRILLER;

    fn snapshot(rows: &[&str]) -> GameSnapshot {
        let grid = Grid::from_rows(rows, 5).unwrap();
        GameState::with_grid(GameConfig::default(), RED_DRILLER, grid, Pos::new(0, 0))
            .unwrap()
            .snapshot()
    }

    #[test]
    fn framebuffer_is_sized_for_board() {
        let snap = snapshot(&["...", "GXA"]);
        let mut fb = FrameBuffer::new(1, 1);
        GameView::new().render(&snap, None, &mut fb);
        assert_eq!((fb.width(), fb.height()), required_size(3, 2));
    }

    #[test]
    fn required_size_saturates_for_huge_boards() {
        assert_eq!(required_size(u16::MAX, u16::MAX), (u16::MAX, u16::MAX));
        assert_eq!(required_size(32_000, 4).0, u16::MAX);
        assert_eq!(required_size(3, 2).1, 18);
    }

    #[test]
    fn board_cells_and_player_are_drawn() {
        let snap = snapshot(&["...", "GXA"]);
        let mut fb = FrameBuffer::new(1, 1);
        GameView::new().render(&snap, None, &mut fb);

        assert!(fb.row_text(1).starts_with("│<>"));
        let row = fb.row_text(2);
        assert!(row.starts_with("│   5O2│"), "row was {:?}", row);
        let green = fb.get(1, 2).unwrap();
        assert_eq!(green.style.bg, block_color(BlockType::Green));
    }

    #[test]
    fn hud_shows_counters() {
        let snap = snapshot(&["...", "GGG"]);
        let mut fb = FrameBuffer::new(1, 1);
        GameView::new().render(&snap, None, &mut fb);
        assert!(fb.contains_text("Red Driller"));
        assert!(fb.contains_text("Depth   0m / 1000m"));
        assert!(fb.contains_text("Oxygen  100%"));
        assert!(fb.contains_text("Score   0"));
        assert!(fb.contains_text("Lives 3"));
    }

    #[test]
    fn toast_and_status_banner() {
        let mut snap = snapshot(&["...", "GGG"]);
        snap.status = GameStatus::Paused;
        let note = Notification::ChainReaction {
            blocks: 4,
            points: 80,
        };
        let mut fb = FrameBuffer::new(1, 1);
        GameView::new().render(&snap, Some(&note), &mut fb);
        assert!(fb.contains_text("PAUSED"));
        assert!(fb.contains_text("Chain Reaction!"));
        assert!(fb.contains_text("4 blocks destroyed! +80 points"));
    }
}
