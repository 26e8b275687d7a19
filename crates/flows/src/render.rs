use crate::config::WindowConfig;
use crate::error::Result;
use codeprompt_editor::{EditorHost, FloatGeometry, Key, Panel, ScreenSize};

/// Keys that close a response panel
pub const DISMISS_KEYS: [Key; 2] = [Key::Char('q'), Key::Esc];

/// `"<prefix>: <label>"`
pub fn panel_title(prefix: &str, label: &str) -> String {
    format!("{prefix}: {label}")
}

/// Centred float covering the configured fraction of the screen
pub fn float_geometry(screen: ScreenSize, window: &WindowConfig, title: String) -> FloatGeometry {
    let width = scaled(screen.cols, window.width);
    let height = scaled(screen.rows, window.height);
    FloatGeometry {
        width,
        height,
        row: screen.rows.saturating_sub(height) / 2,
        col: screen.cols.saturating_sub(width) / 2,
        border: window.border(),
        title,
    }
}

fn scaled(cells: usize, fraction: f64) -> usize {
    ((cells as f64 * fraction).floor() as usize).max(1)
}

/// Shows raw assistant output in a modal panel
#[derive(Debug, Clone, Copy)]
pub struct ResponseRenderer<'a> {
    window: &'a WindowConfig,
    title_prefix: &'a str,
}

impl<'a> ResponseRenderer<'a> {
    pub fn new(window: &'a WindowConfig, title_prefix: &'a str) -> Self {
        Self {
            window,
            title_prefix,
        }
    }

    pub fn panel(&self, screen: ScreenSize, label: &str, text: &str) -> Panel {
        let title = panel_title(self.title_prefix, label);
        Panel {
            geometry: float_geometry(screen, self.window, title),
            lines: text.lines().map(str::to_string).collect(),
            footer: Some("q / <Esc> to close".to_string()),
        }
    }

    /// Open the panel and keep it up until a dismiss key is pressed
    pub fn render(&self, host: &mut dyn EditorHost, label: &str, text: &str) -> Result<()> {
        let panel = self.panel(host.screen_size(), label, text);
        let window = host.open_panel(&panel)?;
        let key = host.wait_for_key(window, &DISMISS_KEYS);
        log::debug!("response panel dismissed with {key:?}");
        host.close_panel(window);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeprompt_editor::{Border, MemoryBuffer, ScriptedHost};
    use pretty_assertions::assert_eq;

    #[test]
    fn geometry_is_centred_fraction() {
        let window = WindowConfig::default();
        let geometry = float_geometry(ScreenSize { cols: 100, rows: 41 }, &window, "t".into());
        assert_eq!(
            geometry,
            FloatGeometry {
                width: 80,
                height: 32,
                row: 4,
                col: 10,
                border: Border::Rounded,
                title: "t".into(),
            }
        );
    }

    #[test]
    fn tiny_screens_still_get_a_cell() {
        let window = WindowConfig {
            width: 0.1,
            height: 0.1,
            border: "none".into(),
        };
        let geometry = float_geometry(ScreenSize { cols: 5, rows: 3 }, &window, String::new());
        assert_eq!((geometry.width, geometry.height), (1, 1));
        assert_eq!((geometry.row, geometry.col), (1, 2));
        assert_eq!(geometry.border, Border::None);
    }

    #[test]
    fn render_opens_and_closes() {
        let window = WindowConfig::default();
        let renderer = ResponseRenderer::new(&window, "Claude Code");
        let mut host = ScriptedHost::new(MemoryBuffer::from_text("x")).press(Key::Esc);

        renderer.render(&mut host, "Current Function", "line 1\nline 2").unwrap();

        assert_eq!(host.panels().len(), 1);
        let panel = &host.panels()[0];
        assert_eq!(panel.geometry.title, "Claude Code: Current Function");
        assert_eq!(panel.lines, vec!["line 1", "line 2"]);
        assert!(host.open_windows().is_empty());
    }
}
