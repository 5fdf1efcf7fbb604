use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Header bar, body and a footer sized to the hint lines it must hold.
pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(footer_lines.max(1)),
            ])
            .split(area);

        Self {
            header: vertical[0],
            main: vertical[1],
            footer: vertical[2],
        }
    }
}

/// Greedily pack key hints into as few lines of `width` as possible.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();

    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let candidate = if current.is_empty() {
            format!("{prefix}{hint}")
        } else {
            format!("{current}{separator}{hint}")
        };
        if candidate.chars().count() <= width || current.is_empty() {
            current = candidate;
        } else {
            out.push(std::mem::take(&mut current));
            current = format!("{prefix}{hint}");
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 60;
    const MIN_POPUP_HEIGHT: u16 = 14;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_hint_lines_wraps_at_width() {
        let lines = pack_hint_lines(&["[Enter] Check", "[n] Next", "[Esc] Quit"], 26);
        assert_eq!(lines, vec!["  [Enter] Check  [n] Next", "  [Esc] Quit"]);
    }

    #[test]
    fn test_pack_hint_lines_empty_inputs() {
        assert!(pack_hint_lines(&[], 80).is_empty());
        assert!(pack_hint_lines(&["a"], 0).is_empty());
        assert!(pack_hint_lines(&["", ""], 80).is_empty());
    }

    #[test]
    fn test_centered_rect_stays_inside_small_areas() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered_rect(50, 50, area);
        assert_eq!(popup, area);

        let big = Rect::new(0, 0, 200, 50);
        let popup = centered_rect(50, 50, big);
        assert_eq!(popup.width, 100);
        assert_eq!(popup.x, 50);
    }

    #[test]
    fn test_app_layout_footer_grows_with_hints() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 24), 2);
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.footer.height, 2);
        assert_eq!(layout.main.height, 21);
    }
}
