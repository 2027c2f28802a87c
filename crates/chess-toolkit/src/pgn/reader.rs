//! PGN import: drives a [`Graph`] and [`GameTags`] from the token stream.

use std::io::BufRead;
use std::ops::ControlFlow;

use tracing::{debug, warn};

use super::lexer::{LexError, Lexer, Spanned, Token};
use super::PgnError;
use crate::{GameTags, Graph};

/// Reads games from `input`, handing each finished one to `on_game`.
///
/// Graph and tags are cleared before the first game and after every game the
/// callback lets through. When the callback breaks, both are left holding the
/// game it was given. Returns the number of games handed out.
pub(crate) fn read_games<R, F>(
    graph: &mut Graph,
    tags: &mut GameTags,
    input: R,
    mut on_game: F,
) -> Result<usize, PgnError>
where
    R: BufRead,
    F: FnMut(&Graph, &GameTags) -> ControlFlow<()>,
{
    graph.reset();
    tags.reset();

    let mut lexer = Lexer::new(input);
    let mut game = 1;
    let mut started = false;
    let mut in_movetext = false;

    loop {
        let spanned = match lexer.next_token() {
            Ok(Some(spanned)) => spanned,
            Ok(None) => break,
            Err(LexError::Io(err)) => return Err(err.into()),
            Err(LexError::Syntax {
                line,
                column,
                token,
                reason,
            }) => {
                return Err(PgnError::Syntax {
                    game,
                    line,
                    column,
                    token,
                    reason: reason.to_string(),
                })
            }
        };
        started = true;

        let Spanned {
            token,
            text,
            line,
            column,
        } = spanned;
        let syntax = |reason: String| PgnError::Syntax {
            game,
            line,
            column,
            token: text.clone(),
            reason,
        };

        match token {
            Token::TagPair { .. } if in_movetext => {
                return Err(syntax("tag pair inside movetext".to_string()));
            }
            Token::TagPair { key, value } => {
                if let Err(err) = tags.set(&key, &value) {
                    warn!(game, line, %err, "dropping tag pair");
                }
            }
            Token::MoveNumber(_) => in_movetext = true,
            Token::San(san) => {
                in_movetext = true;
                let m = graph
                    .move_from_san(&san)
                    .map_err(|err| syntax(err.to_string()))?;
                graph
                    .make_move(m)
                    .map_err(|err| syntax(err.to_string()))?;
            }
            Token::Result(result) => {
                tags.set("Result", &result)
                    .map_err(|err| syntax(err.to_string()))?;
                if finish(graph, tags, game, &mut on_game).is_break() {
                    return Ok(game);
                }
                game += 1;
                started = false;
                in_movetext = false;
            }
        }
    }

    // A game cut off by the end of input still counts.
    if !started {
        return Ok(game - 1);
    }
    let _ = finish(graph, tags, game, &mut on_game);
    Ok(game)
}

fn finish<F>(graph: &mut Graph, tags: &mut GameTags, game: usize, on_game: &mut F) -> ControlFlow<()>
where
    F: FnMut(&Graph, &GameTags) -> ControlFlow<()>,
{
    debug!(game, ply = graph.ply(), result = tags.get("Result").unwrap_or("*"), "parsed game");
    let flow = on_game(graph, tags);
    if flow.is_continue() {
        graph.reset();
        tags.reset();
    }
    flow
}
