use crate::models::Document;

/// Anything that exposes a document for a builder to operate on.
///
/// Implemented for owned documents, mutable borrows, and boxes, so one
/// builder type serves transient, borrowed and externally owned documents.
pub trait DocumentHandle {
    fn document(&self) -> &Document;

    fn document_mut(&mut self) -> &mut Document;

    /// Class path of the owner, used for per-class interface options.
    fn class_path(&self) -> &str {
        ""
    }
}

impl DocumentHandle for Document {
    fn document(&self) -> &Document {
        self
    }

    fn document_mut(&mut self) -> &mut Document {
        self
    }
}

impl<T: DocumentHandle + ?Sized> DocumentHandle for &mut T {
    fn document(&self) -> &Document {
        (**self).document()
    }

    fn document_mut(&mut self) -> &mut Document {
        (**self).document_mut()
    }

    fn class_path(&self) -> &str {
        (**self).class_path()
    }
}

impl<T: DocumentHandle + ?Sized> DocumentHandle for Box<T> {
    fn document(&self) -> &Document {
        (**self).document()
    }

    fn document_mut(&mut self) -> &mut Document {
        (**self).document_mut()
    }

    fn class_path(&self) -> &str {
        (**self).class_path()
    }
}

/// Document tagged with the class path of its owner.
#[derive(Debug, Clone, Default)]
pub struct ClassDocument {
    pub class_path: String,
    pub document: Document,
}

impl ClassDocument {
    pub fn new(class_path: impl Into<String>, document: Document) -> Self {
        Self {
            class_path: class_path.into(),
            document,
        }
    }
}

impl DocumentHandle for ClassDocument {
    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn class_path(&self) -> &str {
        &self.class_path
    }
}
