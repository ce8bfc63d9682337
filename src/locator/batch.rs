//! Batch lookup
//!
//! Evaluates several fields against the same document on rayon's pool. The
//! locator only holds shared references, so workers read the arena
//! concurrently without coordination.

use rayon::prelude::*;

use super::{FieldLocator, Match};
use crate::dom::DocumentAccess;
use crate::error::LocatorError;
use crate::fields::Field;

impl<'a, D: DocumentAccess + Sync + ?Sized> FieldLocator<'a, D> {
    /// First match of each field, in the order the fields were given
    pub fn locate_many(
        &self,
        fields: &[Field],
    ) -> Result<Vec<(Field, Option<Match<'a, D>>)>, LocatorError> {
        let locator = *self;
        fields
            .par_iter()
            .map(|&field| locator.locate(field).map(|found| (field, found)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::NamespaceBinding;
    use crate::config::{EBICS_H004, XML_DSIG};
    use crate::dom::XmlDocument;

    #[test]
    fn test_locate_many_keeps_order() {
        let xml = format!(
            "<ebicsResponse xmlns=\"{EBICS_H004}\">\
             <header><static><TransactionID>ABCDEF</TransactionID><NumSegments>2</NumSegments></static>\
             <mutable><TransactionPhase>Initialisation</TransactionPhase></mutable></header>\
             </ebicsResponse>"
        );
        let doc = XmlDocument::parse(&xml).unwrap();
        let binding = NamespaceBinding::new("ebics", EBICS_H004, "ds", XML_DSIG).unwrap();
        let locator = FieldLocator::new(&doc, &binding);

        let fields = [
            Field::TransactionPhase,
            Field::OrderData,
            Field::TransactionId,
            Field::NumSegments,
        ];
        let results = locator.locate_many(&fields).unwrap();
        let texts: Vec<_> = results
            .iter()
            .map(|(field, found)| (*field, found.map(|m| m.text().into_owned())))
            .collect();
        assert_eq!(
            texts,
            [
                (Field::TransactionPhase, Some("Initialisation".to_string())),
                (Field::OrderData, None),
                (Field::TransactionId, Some("ABCDEF".to_string())),
                (Field::NumSegments, Some("2".to_string())),
            ]
        );
    }

    #[test]
    fn test_locate_many_every_field() {
        let xml = format!("<ebicsResponse xmlns=\"{EBICS_H004}\"/>");
        let doc = XmlDocument::parse(&xml).unwrap();
        let binding = NamespaceBinding::new("ebics", EBICS_H004, "ds", XML_DSIG).unwrap();
        let locator = FieldLocator::new(&doc, &binding);

        let results = locator.locate_many(Field::ALL).unwrap();
        assert_eq!(results.len(), Field::ALL.len());
        assert!(results.iter().all(|(_, found)| found.is_none()));
    }

    #[test]
    fn test_locate_many_without_root() {
        let doc = XmlDocument::parse("  ").unwrap();
        let binding = NamespaceBinding::new("ebics", EBICS_H004, "ds", XML_DSIG).unwrap();
        let locator = FieldLocator::new(&doc, &binding);
        assert!(matches!(
            locator.locate_many(&[Field::OrderId]),
            Err(LocatorError::MalformedDocument(_))
        ));
    }
}
