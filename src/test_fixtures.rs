use crate::book_codes::NameMapping;
use crate::corpus::{Corpus, CorpusLoader};
use crate::resolver::{ReferenceResolver, Resolution};
use crate::resolver_config::ResolverConfig;

/// Three verses across two books, matching the KJV JSON layout.
pub const EXAMPLE_CORPUS: &str = r#"{
  "translation": "KJV: King James Version",
  "books": [
    {
      "name": "Genesis",
      "chapters": [
        {
          "chapter": 1,
          "name": "Genesis 1",
          "verses": [
            {"verse": 1, "chapter": 1, "name": "Genesis 1:1", "text": "In the beginning God created the heaven and the earth."},
            {"verse": 2, "chapter": 1, "name": "Genesis 1:2", "text": "And the earth was without form, and void; and darkness was upon the face of the deep."}
          ]
        }
      ]
    },
    {
      "name": "Exodus",
      "chapters": [
        {
          "chapter": 20,
          "name": "Exodus 20",
          "verses": [
            {"verse": 3, "chapter": 20, "name": "Exodus 20:3", "text": "Thou shalt have no other gods before me."}
          ]
        }
      ]
    }
  ]
}"#;

pub const EXAMPLE_EDGE_LIST: &str =
    "From Verse\tTo Verse\tVotes\nGen.1.1\tExod.20.3\t5\nGen.1.2\tGen.1.1\t3\n";

/// Six verses across three books, including a multi-word book name.
pub const SAMPLE_CORPUS: &str = r#"{
  "books": [
    {
      "name": "Genesis",
      "chapters": [
        {"verses": [
          {"name": "Genesis 1:1", "text": "In the beginning God created the heaven and the earth."},
          {"name": "Genesis 1:2", "text": "And the earth was without form, and void."}
        ]},
        {"verses": [
          {"name": "Genesis 2:1", "text": "Thus the heavens and the earth were finished, and all the host of them."}
        ]}
      ]
    },
    {
      "name": "Exodus",
      "chapters": [
        {"verses": [
          {"name": "Exodus 20:3", "text": "Thou shalt have no other gods before me."}
        ]}
      ]
    },
    {
      "name": "I Samuel",
      "chapters": [
        {"verses": [
          {"name": "I Samuel 17:45", "text": "Then said David to the Philistine, Thou comest to me with a sword."},
          {"name": "I Samuel 17:46", "text": "This day will the LORD deliver thee into mine hand."}
        ]}
      ]
    }
  ]
}"#;

pub const SAMPLE_EDGE_LIST: &str = "From Verse\tTo Verse\tVotes\t#www.openbible.info CC-BY\n\
Gen.1.1\tExod.20.3\t5\n\
Gen.1.1\t1Sam.17.45-1Sam.17.46\t12\n\
Gen.1.1\tExod.20.3\t2\n\
Gen.1.2\tGen.1.1\t3\n\
Gen.2.1\tExod.20.3\t0\n\
Exod.20.3\t1Sam.17.46\t-2\n\
1Sam.17.45\tGen.1.1\t8\n\
1Sam.17.46\tExod.20.3\t4\n\
1Sam.17.46\tExo.20.3\t4\n";

pub fn example_inputs() -> (Corpus, Resolution) {
    example_inputs_with_edges(EXAMPLE_EDGE_LIST)
}

pub fn example_inputs_with_edges(edge_list: &str) -> (Corpus, Resolution) {
    let corpus = CorpusLoader::new().unwrap().load(EXAMPLE_CORPUS).unwrap();
    let resolution = resolve_against(&corpus, edge_list);
    (corpus, resolution)
}

pub fn sample_inputs() -> (Corpus, Resolution) {
    let corpus = CorpusLoader::new().unwrap().load(SAMPLE_CORPUS).unwrap();
    let resolution = resolve_against(&corpus, SAMPLE_EDGE_LIST);
    (corpus, resolution)
}

fn resolve_against(corpus: &Corpus, edge_list: &str) -> Resolution {
    let mapping = NameMapping::kjv();
    let books = corpus.book_set();
    let config = ResolverConfig::default();
    ReferenceResolver::new(&mapping, &books, &config)
        .resolve(edge_list)
        .unwrap()
}
