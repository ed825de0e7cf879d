//! Edits on the comrak tree.
//!
//! Each call parses the engine's markdown into a fresh arena, mutates the
//! tree, and serializes it back to CommonMark.

use std::cell::RefCell;

use comrak::arena_tree::Node;
use comrak::nodes::{Ast, AstNode, LineColumn, NodeHeading, NodeValue};
use comrak::{Arena, format_commonmark, parse_document};

use crate::error::{Result, SyncError};
use crate::render::markdown_options;

use super::{BlockKind, StructuredEdit};

/// Apply `edit` to `markdown` and return the re-serialized text.
pub(super) fn apply(markdown: &str, edit: &StructuredEdit) -> Result<String> {
    let arena = Arena::new();
    let options = markdown_options();
    let root = parse_document(&arena, markdown, &options);

    match edit {
        StructuredEdit::InsertText { block, text } => {
            let node = inline_block(root, *block)?;
            insert_text(&arena, node, text);
        }
        StructuredEdit::ToggleStrong { block } => {
            let node = inline_block(root, *block)?;
            toggle_wrapper(&arena, node, &NodeValue::Strong);
        }
        StructuredEdit::ToggleEmphasis { block } => {
            let node = inline_block(root, *block)?;
            toggle_wrapper(&arena, node, &NodeValue::Emph);
        }
        StructuredEdit::SetHeading { block, level } => {
            if *level > 6 {
                return Err(SyncError::HeadingLevel(*level));
            }
            let node = inline_block(root, *block)?;
            node.data.borrow_mut().value = if *level == 0 {
                NodeValue::Paragraph
            } else {
                NodeValue::Heading(NodeHeading {
                    level: *level,
                    setext: false,
                })
            };
        }
        StructuredEdit::InsertParagraph { at, text } => {
            let paragraph = new_node(&arena, NodeValue::Paragraph);
            paragraph.append(new_node(&arena, NodeValue::Text(text.clone())));
            match root.children().nth(*at) {
                Some(sibling) => sibling.insert_before(paragraph),
                None => root.append(paragraph),
            }
        }
        StructuredEdit::DeleteBlock { block } => {
            nth_block(root, *block)?.detach();
        }
    }

    serialize(root)
}

/// Top-level block kinds of `markdown`, in order.
pub(super) fn outline(markdown: &str) -> Vec<BlockKind> {
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &markdown_options());
    root.children()
        .map(|child| match &child.data.borrow().value {
            NodeValue::Heading(heading) => BlockKind::Heading(heading.level),
            NodeValue::Paragraph => BlockKind::Paragraph,
            NodeValue::List(_) => BlockKind::List,
            NodeValue::CodeBlock(_) => BlockKind::CodeBlock,
            NodeValue::BlockQuote => BlockKind::BlockQuote,
            NodeValue::Table(_) => BlockKind::Table,
            NodeValue::ThematicBreak => BlockKind::ThematicBreak,
            NodeValue::HtmlBlock(_) => BlockKind::Html,
            _ => BlockKind::Other,
        })
        .collect()
}

fn serialize<'a>(root: &'a AstNode<'a>) -> Result<String> {
    let mut out = Vec::new();
    format_commonmark(root, &markdown_options(), &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn new_node<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(Node::new(RefCell::new(Ast::new(
        value,
        LineColumn { line: 0, column: 0 },
    ))))
}

fn nth_block<'a>(root: &'a AstNode<'a>, index: usize) -> Result<&'a AstNode<'a>> {
    root.children().nth(index).ok_or_else(|| SyncError::NoSuchBlock {
        index,
        len: root.children().count(),
    })
}

/// The block at `index`, provided its children are inline content.
fn inline_block<'a>(root: &'a AstNode<'a>, index: usize) -> Result<&'a AstNode<'a>> {
    let node = nth_block(root, index)?;
    let inline = matches!(
        node.data.borrow().value,
        NodeValue::Paragraph | NodeValue::Heading(_)
    );
    if inline {
        Ok(node)
    } else {
        Err(SyncError::NotInline { index })
    }
}

fn insert_text<'a>(arena: &'a Arena<AstNode<'a>>, block: &'a AstNode<'a>, text: &str) {
    if let Some(last) = block.last_child() {
        if let NodeValue::Text(ref mut existing) = last.data.borrow_mut().value {
            existing.push_str(text);
            return;
        }
    }
    block.append(new_node(arena, NodeValue::Text(text.to_string())));
}

/// Wrap all inline children of `block` in `wrapper`, or unwrap them if the
/// block already consists of exactly one such wrapper.
fn toggle_wrapper<'a>(arena: &'a Arena<AstNode<'a>>, block: &'a AstNode<'a>, wrapper: &NodeValue) {
    let only_child = match (block.first_child(), block.last_child()) {
        (Some(first), Some(last)) if std::ptr::eq(first, last) => Some(first),
        _ => None,
    };

    if let Some(child) = only_child
        && std::mem::discriminant(&child.data.borrow().value) == std::mem::discriminant(wrapper)
    {
        let inner: Vec<_> = child.children().collect();
        for node in inner {
            child.insert_before(node);
        }
        child.detach();
        return;
    }

    let wrap = new_node(arena, wrapper.clone());
    let inner: Vec<_> = block.children().collect();
    for node in inner {
        wrap.append(node);
    }
    block.append(wrap);
}
