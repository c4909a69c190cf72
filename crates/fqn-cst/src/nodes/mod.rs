// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

mod declaration;
mod directive;
pub(crate) mod traits;

pub use declaration::{CompilationUnit, Member, NamespaceBody, NamespaceDeclaration, OpaqueMember};
pub use directive::{
    AliasQualifiedName, ExternAliasDirective, GenericName, Name, NameEquals, QualifiedName,
    SimpleName, UsingDirective,
};
pub use traits::{Codegen, CodegenState, NodeId, NodeIdGenerator, Token};
