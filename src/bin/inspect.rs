use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result};

use vellum::dom::markup;
use vellum::{BlockElement, ContentTraverser, Dom, InlineElement, TraversalStart};

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(path_arg) = args.next() else {
        eprintln!("Usage: cargo run --bin inspect -- <file>");
        return Ok(());
    };
    let path = PathBuf::from(path_arg);

    let content =
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let dom = markup::parse(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let root = dom.root();

    let mut blocks = ContentTraverser::body(&dom, root);
    let mut index = 0usize;
    let mut block = blocks.current_block();
    while let Some(current) = block {
        index += 1;
        println!(
            "block {index}: {} {:?}",
            block_label(&dom, &current),
            current.text_content(&dom)
        );

        let mut inlines = ContentTraverser::block(
            &dom,
            root,
            current.start_position(&dom),
            TraversalStart::Begin,
        );
        let mut inline = inlines.current_inline();
        while let Some(ref element) = inline {
            println!("  {}", inline_label(&dom, element));
            inline = inlines.next_inline();
        }

        block = blocks.next_block();
    }
    if index == 0 {
        println!("no blocks");
    }

    Ok(())
}

fn block_label(dom: &Dom, block: &BlockElement) -> String {
    match block {
        BlockElement::SingleNode(node) => match dom.tag(*node) {
            Some(tag) => format!("<{tag}>"),
            None => "text".to_string(),
        },
        BlockElement::StartEnd { .. } => "node run".to_string(),
    }
}

fn inline_label(dom: &Dom, inline: &InlineElement) -> String {
    match inline {
        InlineElement::Run { .. } => format!("run {:?}", inline.text_content(dom)),
        InlineElement::Image { .. } => "image".to_string(),
        InlineElement::Link { .. } => format!("link {:?}", inline.text_content(dom)),
        InlineElement::Empty { .. } => "empty".to_string(),
        InlineElement::Partial(_) => format!("partial {:?}", inline.text_content(dom)),
    }
}
