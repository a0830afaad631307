//! Relation of each pedigree member to the proband
//!
//! Only father and mother edges are stored; everything else is derived by
//! walking them. Members are compared by pedigree id.
//!
//! Checked nearest relation first: parents, children, grandchildren,
//! siblings (twins by shared twin group), grandparents, aunts and uncles,
//! cousins, nephews and nieces. A member reached by none of these but
//! sharing an ancestor with the proband is an "other" relative on the side
//! the shared ancestor sits on. No shared ancestor means unrelated, for
//! example a partner marrying into the family.

use crate::error::UnacceptableReason;
use casebridge_common::model::{Participant, Pedigree, Sex};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationLabel {
    Proband,
    Father,
    Mother,
    Child,
    GrandchildThroughSon,
    GrandchildThroughDaughter,
    FullSibling,
    Twin,
    MaternalHalfSibling,
    PaternalHalfSibling,
    MaternalGrandparent,
    PaternalGrandparent,
    MaternalAuntOrUncle,
    PaternalAuntOrUncle,
    MaternalCousin,
    PaternalCousin,
    /// Child of the proband's brother
    FraternalNephewOrNiece,
    /// Child of the proband's sister
    SororalNephewOrNiece,
    OtherMaternal,
    OtherPaternal,
    OtherBlood,
    Unrelated,
}

impl RelationLabel {
    /// Relation to the proband is decided by the mother's side of the family
    pub fn is_maternal(&self) -> bool {
        matches!(
            self,
            RelationLabel::MaternalHalfSibling
                | RelationLabel::MaternalGrandparent
                | RelationLabel::MaternalAuntOrUncle
                | RelationLabel::MaternalCousin
                | RelationLabel::OtherMaternal
        )
    }

    pub fn is_paternal(&self) -> bool {
        matches!(
            self,
            RelationLabel::PaternalHalfSibling
                | RelationLabel::PaternalGrandparent
                | RelationLabel::PaternalAuntOrUncle
                | RelationLabel::PaternalCousin
                | RelationLabel::OtherPaternal
        )
    }
}

/// Pedigree viewed from its proband
pub struct PedigreeView<'a> {
    pedigree: &'a Pedigree,
    proband: &'a Participant,
}

impl<'a> PedigreeView<'a> {
    /// Fails unless exactly one member is flagged as proband
    pub fn new(pedigree: &'a Pedigree) -> Result<Self, UnacceptableReason> {
        let mut probands = pedigree.probands();
        match (probands.next(), probands.next()) {
            (Some(proband), None) => Ok(Self { pedigree, proband }),
            (None, _) => Err(UnacceptableReason::NoProband),
            (Some(_), Some(_)) => Err(UnacceptableReason::MultipleProbands {
                pedigree_ids: pedigree.probands().map(|m| m.pedigree_id).collect(),
            }),
        }
    }

    pub fn proband(&self) -> &'a Participant {
        self.proband
    }

    pub fn father(&self) -> Option<&'a Participant> {
        self.pedigree.father_of(self.proband)
    }

    pub fn mother(&self) -> Option<&'a Participant> {
        self.pedigree.mother_of(self.proband)
    }

    /// Every member other than the proband and the proband's parents, with
    /// its relation label, in pedigree order
    pub fn relatives(&self) -> Vec<(&'a Participant, RelationLabel)> {
        self.pedigree
            .members
            .iter()
            .map(|member| (member, self.relation_of(member)))
            .filter(|(_, label)| {
                !matches!(
                    label,
                    RelationLabel::Proband | RelationLabel::Father | RelationLabel::Mother
                )
            })
            .collect()
    }

    pub fn relation_of(&self, member: &Participant) -> RelationLabel {
        let proband = self.proband;
        let id = member.pedigree_id;

        if id == proband.pedigree_id {
            return RelationLabel::Proband;
        }
        if proband.father_id == Some(id) {
            return RelationLabel::Father;
        }
        if proband.mother_id == Some(id) {
            return RelationLabel::Mother;
        }
        if is_child_of(member, proband.pedigree_id) {
            return RelationLabel::Child;
        }
        if let Some(label) = self.grandchild_label(member) {
            return label;
        }
        if let Some(label) = sibling_label(proband, member) {
            return label;
        }
        if self.is_child_of_parent(self.mother(), id) {
            return RelationLabel::MaternalGrandparent;
        }
        if self.is_child_of_parent(self.father(), id) {
            return RelationLabel::PaternalGrandparent;
        }
        if let Some(mother) = self.mother() {
            if sibling_label(mother, member).is_some() {
                return RelationLabel::MaternalAuntOrUncle;
            }
        }
        if let Some(father) = self.father() {
            if sibling_label(father, member).is_some() {
                return RelationLabel::PaternalAuntOrUncle;
            }
        }
        if let Some(label) = self.cousin_or_nibling_label(member) {
            return label;
        }
        self.distant_label(member)
    }

    fn is_child_of_parent(&self, parent: Option<&Participant>, candidate: u32) -> bool {
        parent.is_some_and(|p| p.father_id == Some(candidate) || p.mother_id == Some(candidate))
    }

    fn parents(&self, member: &Participant) -> impl Iterator<Item = &'a Participant> {
        let pedigree = self.pedigree;
        [member.father_id, member.mother_id]
            .into_iter()
            .flatten()
            .filter_map(move |id| pedigree.member(id))
    }

    fn grandchild_label(&self, member: &Participant) -> Option<RelationLabel> {
        let proband_id = self.proband.pedigree_id;
        let parent = self
            .parents(member)
            .find(|parent| is_child_of(parent, proband_id))?;

        Some(match parent.sex {
            Sex::Male => RelationLabel::GrandchildThroughSon,
            Sex::Female => RelationLabel::GrandchildThroughDaughter,
            Sex::Unknown => RelationLabel::OtherBlood,
        })
    }

    fn cousin_or_nibling_label(&self, member: &Participant) -> Option<RelationLabel> {
        for parent in self.parents(member) {
            if sibling_label(self.proband, parent).is_some() {
                return Some(match parent.sex {
                    Sex::Male => RelationLabel::FraternalNephewOrNiece,
                    Sex::Female => RelationLabel::SororalNephewOrNiece,
                    Sex::Unknown => RelationLabel::OtherBlood,
                });
            }
            if let Some(mother) = self.mother() {
                if sibling_label(mother, parent).is_some() {
                    return Some(RelationLabel::MaternalCousin);
                }
            }
            if let Some(father) = self.father() {
                if sibling_label(father, parent).is_some() {
                    return Some(RelationLabel::PaternalCousin);
                }
            }
        }
        None
    }

    fn distant_label(&self, member: &Participant) -> RelationLabel {
        let ancestry = self.lineage(member);
        if self.lineage(self.proband).is_disjoint(&ancestry) {
            return RelationLabel::Unrelated;
        }

        let maternal = self
            .mother()
            .is_some_and(|mother| !self.lineage(mother).is_disjoint(&ancestry));
        let paternal = self
            .father()
            .is_some_and(|father| !self.lineage(father).is_disjoint(&ancestry));

        match (maternal, paternal) {
            (true, false) => RelationLabel::OtherMaternal,
            (false, true) => RelationLabel::OtherPaternal,
            _ => RelationLabel::OtherBlood,
        }
    }

    /// The member and all of their ancestors present in the pedigree
    fn lineage(&self, member: &Participant) -> HashSet<u32> {
        let mut seen = HashSet::new();
        let mut pending = vec![member.pedigree_id];

        while let Some(id) = pending.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(current) = self.pedigree.member(id) {
                pending.extend(current.father_id);
                pending.extend(current.mother_id);
            }
        }
        seen
    }
}

fn is_child_of(member: &Participant, parent_id: u32) -> bool {
    member.father_id == Some(parent_id) || member.mother_id == Some(parent_id)
}

/// Sibling relation between two distinct members, judged by shared parents
fn sibling_label(of: &Participant, member: &Participant) -> Option<RelationLabel> {
    if of.pedigree_id == member.pedigree_id {
        return None;
    }
    let same = |a: Option<u32>, b: Option<u32>| a.is_some() && a == b;
    let shared_mother = same(of.mother_id, member.mother_id);
    let shared_father = same(of.father_id, member.father_id);

    match (shared_mother, shared_father) {
        (true, true) => {
            let twins = of.twin_group.is_some() && of.twin_group == member.twin_group;
            Some(if twins {
                RelationLabel::Twin
            } else {
                RelationLabel::FullSibling
            })
        }
        (true, false) => Some(RelationLabel::MaternalHalfSibling),
        (false, true) => Some(RelationLabel::PaternalHalfSibling),
        (false, false) => None,
    }
}
