use crate::types::{LineCluster, Token};

struct OpenLine {
    tokens: Vec<Token>,
    top_sum: f64,
}

impl OpenLine {
    fn start(token: Token) -> Self {
        Self {
            top_sum: token.bbox.top,
            tokens: vec![token],
        }
    }

    fn average_top(&self) -> f64 {
        self.top_sum / self.tokens.len() as f64
    }

    fn push(&mut self, token: Token) {
        self.top_sum += token.bbox.top;
        self.tokens.push(token);
    }

    fn close(mut self) -> LineCluster {
        let average_top = self.average_top();
        self.tokens.sort_by(|a, b| a.bbox.left.total_cmp(&b.bbox.left));
        LineCluster {
            tokens: self.tokens,
            average_top,
        }
    }
}

/// Group the tokens of one column into visual lines.
///
/// Tokens are visited top to bottom (ties broken by `left`). A token joins the
/// open line while its `top` is within `tolerance` of the line's running
/// average `top`; otherwise the line is closed and a new one starts. Closed
/// lines are ordered left to right by `left`.
pub fn cluster_lines(mut tokens: Vec<Token>, tolerance: f64) -> Vec<LineCluster> {
    tokens.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then_with(|| a.bbox.left.total_cmp(&b.bbox.left))
    });

    let mut lines = Vec::new();
    let mut current: Option<OpenLine> = None;

    for token in tokens {
        current = Some(match current.take() {
            Some(mut line) if (token.bbox.top - line.average_top()).abs() <= tolerance => {
                line.push(token);
                line
            }
            Some(line) => {
                lines.push(line.close());
                OpenLine::start(token)
            }
            None => OpenLine::start(token),
        });
    }

    if let Some(line) = current {
        lines.push(line.close());
    }

    lines
}
