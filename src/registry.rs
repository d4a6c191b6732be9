//! Conversion registry: which converter handles which format pair.

use crate::config::ConverterConfig;
use crate::convert::{
    Converter, ImageToImage, ImageToPdf, ImageToText, PdfToDocx, PdfToPptx,
    PresentationToArchive, PresentationToPdf, TextConverter, TextSink, TextSource,
};
use crate::format::Format;
use std::collections::BTreeMap;
use std::fmt;

/// Collects converters before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: BTreeMap<(Format, Format), Box<dyn Converter>>,
}

impl RegistryBuilder {
    /// Start an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `converter` for `from` → `to`, replacing any earlier entry.
    pub fn register<C>(mut self, from: Format, to: Format, converter: C) -> Self
    where
        C: Converter + 'static,
    {
        self.insert(from, to, Box::new(converter));
        self
    }

    /// Register an already boxed converter.
    pub fn register_boxed(mut self, from: Format, to: Format, converter: Box<dyn Converter>) -> Self {
        self.insert(from, to, converter);
        self
    }

    fn insert(&mut self, from: Format, to: Format, converter: Box<dyn Converter>) {
        if let Some(old) = self.entries.insert((from, to), converter) {
            tracing::debug!(%from, %to, replaced = old.name(), "converter replaced");
        }
    }

    /// Freeze the registry.
    pub fn build(self) -> Registry {
        Registry {
            entries: self.entries,
        }
    }
}

/// Immutable map from an ordered (source, target) pair to a converter.
pub struct Registry {
    entries: BTreeMap<(Format, Format), Box<dyn Converter>>,
}

impl Registry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The standard set of conversions.
    pub fn with_defaults(config: &ConverterConfig) -> Self {
        let mut builder = RegistryBuilder::new();

        let text_sinks = |to: Format| match to {
            Format::Txt => Some(TextSink::Plain),
            Format::Docx => Some(TextSink::Document),
            Format::Xlsx => Some(TextSink::Spreadsheet),
            Format::Pdf => Some(TextSink::Pdf(config.page.clone())),
            Format::Png => Some(TextSink::Image {
                format: Format::Png,
                options: config.text_image.clone(),
            }),
            _ => None,
        };
        let text_pairs: [(Format, &[Format]); 3] = [
            (Format::Txt, &[Format::Docx, Format::Pdf, Format::Png]),
            (Format::Docx, &[Format::Txt, Format::Pdf, Format::Png, Format::Xlsx]),
            (Format::Xlsx, &[Format::Pdf, Format::Docx, Format::Txt, Format::Png]),
        ];
        for (from, targets) in text_pairs {
            let Some(source) = TextSource::for_format(from) else {
                continue;
            };
            for &to in targets {
                if let Some(sink) = text_sinks(to) {
                    builder = builder.register(from, to, TextConverter::new(source, sink));
                }
            }
        }

        builder = builder
            .register(Format::Pptx, Format::Pdf, PresentationToPdf::new(config))
            .register(Format::Pptx, Format::Zip, PresentationToArchive::new(config))
            .register(Format::Pdf, Format::Docx, PdfToDocx::new(config))
            .register(Format::Pdf, Format::Pptx, PdfToPptx::new(config));

        for from in Format::RASTER {
            builder = builder
                .register(from, Format::Pdf, ImageToPdf)
                .register(from, Format::Txt, ImageToText::new(config));
            for to in Format::RASTER {
                if to != from {
                    builder = builder.register(from, to, ImageToImage::new(to));
                }
            }
        }

        builder.build()
    }

    /// Converter for an ordered pair.
    pub fn get(&self, from: Format, to: Format) -> Option<&dyn Converter> {
        self.entries.get(&(from, to)).map(|c| c.as_ref())
    }

    /// Targets reachable from `from`, in format order. The source format
    /// itself is never listed.
    pub fn targets_for(&self, from: Format) -> Vec<Format> {
        self.entries
            .range((from, Format::ALL[0])..)
            .take_while(|((source, _), _)| *source == from)
            .map(|((_, target), _)| *target)
            .filter(|target| *target != from)
            .collect()
    }

    /// Whether any conversion starts from `format`.
    pub fn accepts_source(&self, format: Format) -> bool {
        !self.targets_for(format).is_empty()
    }

    /// Every registered pair with its converter name.
    pub fn pairs(&self) -> impl Iterator<Item = (Format, Format, &str)> + '_ {
        self.entries
            .iter()
            .map(|((from, to), converter)| (*from, *to, converter.name()))
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs = self
            .pairs()
            .map(|(from, to, name)| (format!("{}->{}", from.extension(), to.extension()), name));
        f.debug_map().entries(pairs).finish()
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("entries", &self.entries.len())
            .finish()
    }
}
